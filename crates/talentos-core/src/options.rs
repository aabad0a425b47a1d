//! Canonical vocabularies that free-text answers are resolved onto.
//!
//! The options document is JSON: every top-level key except `places` names a
//! flat, ordered vocabulary; `places` maps a canonical department to its
//! ordered list of canonical municipalities. It is loaded once and passed by
//! reference to every formatter.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TalentosError;

const DEFAULT_OPTIONS: &str = include_str!("../../../config/options.json");

/// A flat vocabulary in the options document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    Bool,
    IdDocumentType,
    Gender,
    Ethnicity,
    Disability,
    LanguageLevel,
    LanguageLevelLabels,
    Degree,
    DegreeStatus,
    MvProgram,
    Occupation,
    Sector,
    Role,
    ExperienceDuration,
    Motivations,
}

impl Vocabulary {
    pub const ALL: &'static [Vocabulary] = &[
        Vocabulary::Bool,
        Vocabulary::IdDocumentType,
        Vocabulary::Gender,
        Vocabulary::Ethnicity,
        Vocabulary::Disability,
        Vocabulary::LanguageLevel,
        Vocabulary::LanguageLevelLabels,
        Vocabulary::Degree,
        Vocabulary::DegreeStatus,
        Vocabulary::MvProgram,
        Vocabulary::Occupation,
        Vocabulary::Sector,
        Vocabulary::Role,
        Vocabulary::ExperienceDuration,
        Vocabulary::Motivations,
    ];

    /// Key of this vocabulary in the options document.
    pub fn key(self) -> &'static str {
        match self {
            Vocabulary::Bool => "bool",
            Vocabulary::IdDocumentType => "id_document_type",
            Vocabulary::Gender => "gender",
            Vocabulary::Ethnicity => "ethnicity_or_culture",
            Vocabulary::Disability => "disability_condition",
            Vocabulary::LanguageLevel => "language_level",
            Vocabulary::LanguageLevelLabels => "language_level_labels",
            Vocabulary::Degree => "degree",
            Vocabulary::DegreeStatus => "degree_status",
            Vocabulary::MvProgram => "mv_program",
            Vocabulary::Occupation => "occupation",
            Vocabulary::Sector => "sector",
            Vocabulary::Role => "role",
            Vocabulary::ExperienceDuration => "experience_duration",
            Vocabulary::Motivations => "motivations",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Vocabulary {
    type Err = TalentosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vocabulary::ALL
            .iter()
            .copied()
            .find(|v| v.key() == s)
            .ok_or_else(|| TalentosError::Options(format!("unknown vocabulary '{s}'")))
    }
}

/// Immutable snapshot of every vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Department → municipalities. Departments are ordered by name.
    #[serde(default)]
    places: BTreeMap<String, Vec<String>>,
    #[serde(flatten)]
    vocabularies: BTreeMap<String, Vec<String>>,
}

impl Options {
    /// Parse and validate an options document.
    pub fn from_json(json: &str) -> Result<Self, TalentosError> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read an options document from disk.
    pub fn from_path(path: &Path) -> Result<Self, TalentosError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            TalentosError::Options(format!("cannot read {}: {e}", path.display()))
        })?;
        let options = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            vocabularies = options.vocabularies.len(),
            departments = options.places.len(),
            "Loaded options"
        );
        Ok(options)
    }

    /// Entries of a flat vocabulary; empty when the document lacks it.
    pub fn vocabulary(&self, vocabulary: Vocabulary) -> &[String] {
        self.vocabularies
            .get(vocabulary.key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Canonical department names, sorted by name.
    pub fn departments(&self) -> Vec<&str> {
        self.places.keys().map(String::as_str).collect()
    }

    /// Canonical municipalities of a canonical department.
    pub fn municipalities(&self, department: &str) -> &[String] {
        self.places
            .get(department)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<(), TalentosError> {
        let codes = self.vocabulary(Vocabulary::LanguageLevel).len();
        let labels = self.vocabulary(Vocabulary::LanguageLevelLabels).len();
        if codes != labels {
            return Err(TalentosError::Options(format!(
                "{} has {codes} entries but {} has {labels}",
                Vocabulary::LanguageLevel,
                Vocabulary::LanguageLevelLabels
            )));
        }
        for (key, entries) in &self.vocabularies {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(TalentosError::Options(format!(
                    "vocabulary '{key}' contains an empty entry"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::from_json(DEFAULT_OPTIONS).expect("built-in options document is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_parse() {
        let options = Options::default();
        assert_eq!(options.vocabulary(Vocabulary::Bool), ["Sí", "No"]);
        assert!(options.departments().contains(&"Bogotá D.C."));
        assert_eq!(options.municipalities("Bogotá D.C."), ["Bogotá D.C."]);
    }

    #[test]
    fn every_vocabulary_is_present_by_default() {
        let options = Options::default();
        for vocabulary in Vocabulary::ALL {
            assert!(
                !options.vocabulary(*vocabulary).is_empty(),
                "missing {vocabulary}"
            );
        }
    }

    #[test]
    fn missing_vocabulary_is_empty() {
        let options = Options::from_json(r#"{"bool": ["Sí", "No"]}"#).unwrap();
        assert!(options.vocabulary(Vocabulary::Gender).is_empty());
        assert!(options.departments().is_empty());
        assert!(options.municipalities("Antioquia").is_empty());
    }

    #[test]
    fn mismatched_language_lists_rejected() {
        let json = r#"{"language_level": ["A0", "A1"], "language_level_labels": ["Principiante (A0)"]}"#;
        assert!(matches!(
            Options::from_json(json),
            Err(TalentosError::Options(_))
        ));
    }

    #[test]
    fn empty_entry_rejected() {
        let json = r#"{"gender": ["Femenino", " "]}"#;
        assert!(Options::from_json(json).is_err());
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(matches!(
            Options::from_json("{not json"),
            Err(TalentosError::Json(_))
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"places": {"Caldas": ["Manizales"]}}"#).unwrap();
        let options = Options::from_path(&path).unwrap();
        assert_eq!(options.municipalities("Caldas"), ["Manizales"]);
    }

    #[test]
    fn vocabulary_keys_roundtrip() {
        for vocabulary in Vocabulary::ALL {
            assert_eq!(vocabulary.key().parse::<Vocabulary>().unwrap(), *vocabulary);
        }
        assert!("nope".parse::<Vocabulary>().is_err());
    }
}
