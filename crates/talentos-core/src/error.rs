use thiserror::Error;

#[derive(Debug, Error)]
pub enum TalentosError {
    #[error("config error: {0}")]
    Config(String),

    #[error("options error: {0}")]
    Options(String),

    #[error("import error: {0}")]
    Import(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
