use std::fs;
use std::path::{Path, PathBuf};

use talentos_core::config::AppConfig;
use talentos_core::format::Formatter;
use talentos_core::ids;
use talentos_core::import::Importer;
use talentos_core::models::{Field, Profile};
use talentos_core::options::Vocabulary;

use crate::error::CliError;

pub(crate) fn run_normalize(text: &str) {
    println!("{}", talentos_match::normalize(text));
}

pub(crate) fn run_match(config: &AppConfig, vocabulary: &str, value: &str) -> Result<(), CliError> {
    let vocabulary: Vocabulary = vocabulary.parse()?;
    let options = config.options()?;
    let matcher = config.matching.matcher();

    let ranked = matcher.closest_matches(options.vocabulary(vocabulary), value);
    if ranked.is_empty() {
        println!("No option of '{vocabulary}' clears {:.2}", matcher.cutoff());
    }
    for scored in ranked {
        println!("{:.3}  {}", scored.score, scored.option);
    }
    Ok(())
}

pub(crate) fn run_format(config: &AppConfig, field: &str, value: &str) -> Result<(), CliError> {
    let field: Field = field.parse()?;
    let options = config.options()?;
    let formatter = Formatter::new(&options, config.matching.matcher());
    println!("{}", formatter.apply(field, value));
    Ok(())
}

pub(crate) fn run_place(
    config: &AppConfig,
    department: &str,
    municipality: &str,
) -> Result<(), CliError> {
    let options = config.options()?;
    let formatter = Formatter::new(&options, config.matching.matcher());
    let (department, municipality) = formatter.place(department, municipality);
    println!("{department}\t{municipality}");
    Ok(())
}

pub(crate) fn run_forms(config: &AppConfig) {
    if config.import_forms.is_empty() {
        println!("No import forms configured.");
        return;
    }
    for (i, form) in config.import_forms.iter().enumerate() {
        println!(
            "{i}  {}  ({} columns, {} header rows)",
            form.name,
            form.columns.len(),
            form.header_rows
        );
    }
}

pub(crate) fn run_import(
    config: &AppConfig,
    form: &str,
    csv_path: &Path,
    existing: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let form = config.import_form(form)?;
    let options = config.options()?;
    let rows = read_rows(csv_path)?;
    let existing = match existing {
        Some(path) => read_profiles(path)?,
        None => Vec::new(),
    };

    let importer = Importer::new(form, &options, config.matching.matcher());
    let batch = importer.import_rows(&rows, &existing);
    let json = serde_json::to_string_pretty(&batch)?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            tracing::info!(path = %path.display(), "Wrote import batch");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) fn run_file_name(name: &str, document: &str, extension: &str) {
    let doc_id = ids::deterministic_id(document);
    println!("{}", ids::file_name(&doc_id, &ids::name_id(name), extension));
}

pub(crate) fn run_id(identifier: Option<&str>) {
    match identifier {
        Some(identifier) => println!("{}", ids::deterministic_id(identifier)),
        None => println!("{}", ids::random_id()),
    }
}

pub(crate) fn run_config_path() {
    println!("{}", AppConfig::config_path().display());
}

/// Write the active config to the user config file.
pub(crate) fn run_config_init(config: &AppConfig, force: bool) -> Result<(), CliError> {
    let path: PathBuf = AppConfig::config_path();
    if path.exists() && !force {
        println!("{} already exists (use --force to overwrite)", path.display());
        return Ok(());
    }
    config.save()?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Every record of a sheet export, header rows included.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "Read CSV export");
    Ok(rows)
}

/// Profiles already in the bank, as a JSON array.
fn read_profiles(path: &Path) -> Result<Vec<Profile>, CliError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
