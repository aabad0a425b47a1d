//! talentos CLI
//!
//! Normalizes survey answers of the talent bank and imports sheet exports
//! into canonical profiles.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use talentos_core::config::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "talentos")]
#[command(about = "Normalize and import talent bank survey answers", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config, then the built-in one)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log match decisions and fallbacks
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the comparison form of a text
    Normalize { text: String },

    /// Rank the options of a vocabulary against an answer
    Match {
        /// Vocabulary key (e.g. gender, id_document_type)
        vocabulary: String,
        value: String,
    },

    /// Format an answer with the formatter of a profile field
    Format {
        /// Field key (e.g. full_name, english_level)
        field: String,
        value: String,
    },

    /// Resolve a department and municipality pair
    Place {
        department: String,
        municipality: String,
    },

    /// List configured import forms
    Forms,

    /// Import a CSV export of a form sheet and print the batch as JSON
    Import {
        /// Form name or position
        #[arg(short, long, default_value = "0")]
        form: String,

        csv: PathBuf,

        /// JSON array of profiles already in the bank
        #[arg(short, long)]
        existing: Option<PathBuf>,

        /// Write the batch here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Storage file name for a candidate's document
    FileName {
        #[arg(long)]
        name: String,

        #[arg(long)]
        document: String,

        #[arg(long, default_value = ".pdf")]
        ext: String,
    },

    /// Deterministic id of an identifier, or a random id
    Id { identifier: Option<String> },

    /// Manage the user config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the user config file path
    Path,

    /// Write the active config to the user config file
    Init {
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "talentos=debug" } else { "talentos=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize { text } => commands::run_normalize(&text),
        Commands::Match { vocabulary, value } => commands::run_match(&config, &vocabulary, &value)?,
        Commands::Format { field, value } => commands::run_format(&config, &field, &value)?,
        Commands::Place {
            department,
            municipality,
        } => commands::run_place(&config, &department, &municipality)?,
        Commands::Forms => commands::run_forms(&config),
        Commands::Import {
            form,
            csv,
            existing,
            output,
        } => commands::run_import(&config, &form, &csv, existing.as_deref(), output.as_deref())?,
        Commands::FileName {
            name,
            document,
            ext,
        } => commands::run_file_name(&name, &document, &ext),
        Commands::Id { identifier } => commands::run_id(identifier.as_deref()),
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::run_config_path(),
            ConfigAction::Init { force } => commands::run_config_init(&config, force)?,
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}
