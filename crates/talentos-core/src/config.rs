use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use talentos_match::Matcher;

use crate::error::TalentosError;
use crate::options::Options;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Options document replacing the built-in vocabularies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_path: Option<PathBuf>,
    pub matching: MatchingConfig,
    #[serde(default)]
    pub import_forms: Vec<ImportForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub cutoff: f64,
    pub candidates: usize,
}

impl MatchingConfig {
    pub fn matcher(&self) -> Matcher {
        Matcher::new(self.cutoff, self.candidates)
    }
}

/// One survey spreadsheet and where each field lives in its rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportForm {
    pub name: String,
    #[serde(default)]
    pub sheet_id: String,
    #[serde(default)]
    pub range_name: String,
    /// Leading rows that hold headers rather than answers.
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    /// Field key → column(s) holding the answer.
    pub columns: BTreeMap<String, ColumnRange>,
}

fn default_header_rows() -> usize {
    1
}

/// A single column index or an inclusive `[start, end]` span of columns.
///
/// Spans cover questions that moved between columns across form revisions;
/// the first non-blank cell in the span is the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRange {
    Single(usize),
    Span([usize; 2]),
}

impl ColumnRange {
    /// Inclusive `(start, end)` bounds.
    pub fn bounds(self) -> (usize, usize) {
        match self {
            ColumnRange::Single(i) => (i, i),
            ColumnRange::Span([start, end]) => (start, end),
        }
    }
}

impl AppConfig {
    /// Load config: explicit path, else user file (if exists), else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, TalentosError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        let user_path = Self::config_path();
        if user_path.exists() {
            Self::from_path(&user_path)
        } else {
            Self::from_toml(DEFAULT_CONFIG)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, TalentosError> {
        let config: Self =
            toml::from_str(content).map_err(|e| TalentosError::Config(e.to_string()))?;
        if config.matching.cutoff.is_nan() {
            return Err(TalentosError::Config("matching.cutoff must be a number".into()));
        }
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self, TalentosError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TalentosError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), forms = config.import_forms.len(), "Loaded config");
        Ok(config)
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), TalentosError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TalentosError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Vocabularies named by `options_path`, or the built-in ones.
    ///
    /// A relative `options_path` is resolved against the working directory.
    pub fn options(&self) -> Result<Options, TalentosError> {
        match &self.options_path {
            Some(path) => Options::from_path(path),
            None => Ok(Options::default()),
        }
    }

    /// Find an import form by name (case-insensitive) or by position.
    pub fn import_form(&self, selector: &str) -> Result<&ImportForm, TalentosError> {
        let by_name = self
            .import_forms
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(selector.trim()));
        let by_index = || {
            selector
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| self.import_forms.get(i))
        };
        by_name
            .or_else(by_index)
            .ok_or_else(|| TalentosError::Import(format!("no import form '{selector}'")))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "talentos")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.matching.cutoff, 0.6);
        assert_eq!(config.matching.candidates, 2);
        assert!(config.options_path.is_none());
        assert!(!config.import_forms.is_empty());
    }

    #[test]
    fn test_default_form_columns() {
        let config = AppConfig::default();
        let form = &config.import_forms[0];
        assert_eq!(form.header_rows, 1);
        assert_eq!(form.columns["full_name"], ColumnRange::Single(5));
        for key in form.columns.keys() {
            assert!(
                key.parse::<crate::models::Field>().is_ok(),
                "unknown field {key}"
            );
        }
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized = AppConfig::from_toml(&serialized).unwrap();
        assert_eq!(deserialized.matching.cutoff, config.matching.cutoff);
        assert_eq!(deserialized.import_forms.len(), config.import_forms.len());
    }

    #[test]
    fn test_column_ranges() {
        let config = AppConfig::from_toml(
            r#"
            [matching]
            cutoff = 0.7
            candidates = 3

            [[import_forms]]
            name = "Abierta"
            header_rows = 2

            [import_forms.columns]
            full_name = 2
            motivations = [4, 6]
            "#,
        )
        .unwrap();
        let form = &config.import_forms[0];
        assert_eq!(form.header_rows, 2);
        assert_eq!(form.columns["full_name"].bounds(), (2, 2));
        assert_eq!(form.columns["motivations"].bounds(), (4, 6));
        assert_eq!(config.matching.matcher(), Matcher::new(0.7, 3));
    }

    #[test]
    fn test_nan_cutoff_rejected() {
        let result = AppConfig::from_toml("[matching]\ncutoff = nan\ncandidates = 2\n");
        assert!(matches!(result, Err(TalentosError::Config(_))));
    }

    #[test]
    fn test_import_form_selector() {
        let config = AppConfig::default();
        let first = &config.import_forms[0].name;
        assert_eq!(&config.import_form("0").unwrap().name, first);
        assert_eq!(&config.import_form(&first.to_uppercase()).unwrap().name, first);
        assert!(config.import_form("no existe").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[matching]\ncutoff = 0.8\ncandidates = 1\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.matching.cutoff, 0.8);
        assert!(config.import_forms.is_empty());
    }

    #[test]
    fn test_load_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(TalentosError::Config(_))
        ));
    }

    #[test]
    fn test_options_from_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"bool": ["Sí", "No"]}"#).unwrap();
        let config = AppConfig {
            options_path: Some(path),
            ..AppConfig::default()
        };
        let options = config.options().unwrap();
        assert!(options.departments().is_empty());
    }
}
