use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TalentosError;
use crate::options::Vocabulary;

/// A candidate profile as stored in the resume bank.
///
/// Every answer is kept as its canonical display string; empty means
/// "no answer".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub email_form: String,
    pub authorize_contact: String,
    pub authorize_participation: String,
    pub motivations: String,
    pub professional_profile: String,
    pub full_name: String,
    pub birth_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub id_document_type: String,
    pub id_document_number: String,
    pub id_document_number_confirmation: String,
    pub phone: String,
    pub other_phone: String,
    pub email: String,
    pub birth_department: String,
    pub birth_municipality: String,
    pub residence_department: String,
    pub residence_municipality: String,
    pub gender: String,
    pub ethnicity_or_culture: String,
    pub disability_condition: String,
    pub undergraduate_degree: String,
    pub undergraduate_institution: String,
    pub english_level: String,
    pub french_level: String,
    pub portuguese_level: String,
    pub other_languages_level: String,
    pub has_degree: String,
    pub degree_1: String,
    pub degree_1_name: String,
    pub degree_1_status: String,
    pub degree_2: String,
    pub degree_2_name: String,
    pub degree_2_status: String,
    pub degree_3: String,
    pub degree_3_name: String,
    pub degree_3_status: String,
    pub linkedin: String,
    pub mv_participation: String,
    pub mv_program_1: String,
    pub mv_program_1_year: String,
    pub mv_program_2: String,
    pub mv_program_2_year: String,
    pub mv_program_3: String,
    pub mv_program_3_year: String,
    pub mlk_program: String,
    pub fulbright_seminar: String,
    pub occupation: String,
    pub company: String,
    pub sector: String,
    pub role: String,
    pub role_description: String,
    pub experience_sector: String,
    pub experience_duration: String,
    pub resume_name: String,
    pub resume_link: String,
    pub photo_name: String,
    pub photo_link: String,
    pub tag: String,
}

/// How a raw answer is turned into a canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed, otherwise untouched.
    Plain,
    /// "Sí" / "No".
    Bool,
    /// Person name in title case.
    Title,
    /// Closest entry of a vocabulary.
    Choice(Vocabulary),
    /// Comma-separated multi-select over the motivations vocabulary.
    Motivations,
    /// Compact language level code.
    Language,
    Linkedin,
    DocumentNumber,
    Phone,
    Date,
    /// Resolved in department/municipality pairs after the row is read.
    Place,
}

macro_rules! profile_fields {
    ($($variant:ident => $name:ident: $kind:expr,)*) => {
        /// A form field that can be filled from an import row.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant,)*];

            /// Column-mapping key and serialized name of the field.
            pub fn key(self) -> &'static str {
                match self {
                    $(Field::$variant => stringify!($name),)*
                }
            }

            pub fn kind(self) -> FieldKind {
                match self {
                    $(Field::$variant => $kind,)*
                }
            }
        }

        impl Profile {
            pub fn get(&self, field: Field) -> &str {
                match field {
                    $(Field::$variant => &self.$name,)*
                }
            }

            pub fn set(&mut self, field: Field, value: String) {
                match field {
                    $(Field::$variant => self.$name = value,)*
                }
            }
        }
    };
}

use FieldKind::*;

profile_fields! {
    EmailForm => email_form: Plain,
    AuthorizeContact => authorize_contact: Bool,
    AuthorizeParticipation => authorize_participation: Bool,
    Motivations => motivations: FieldKind::Motivations,
    ProfessionalProfile => professional_profile: Plain,
    FullName => full_name: Title,
    BirthDate => birth_date: Date,
    IdDocumentType => id_document_type: Choice(Vocabulary::IdDocumentType),
    IdDocumentNumber => id_document_number: DocumentNumber,
    IdDocumentNumberConfirmation => id_document_number_confirmation: DocumentNumber,
    Phone => phone: FieldKind::Phone,
    OtherPhone => other_phone: FieldKind::Phone,
    Email => email: Plain,
    BirthDepartment => birth_department: Place,
    BirthMunicipality => birth_municipality: Place,
    ResidenceDepartment => residence_department: Place,
    ResidenceMunicipality => residence_municipality: Place,
    Gender => gender: Choice(Vocabulary::Gender),
    EthnicityOrCulture => ethnicity_or_culture: Choice(Vocabulary::Ethnicity),
    DisabilityCondition => disability_condition: Choice(Vocabulary::Disability),
    UndergraduateDegree => undergraduate_degree: Plain,
    UndergraduateInstitution => undergraduate_institution: Plain,
    EnglishLevel => english_level: Language,
    FrenchLevel => french_level: Language,
    PortugueseLevel => portuguese_level: Language,
    OtherLanguagesLevel => other_languages_level: Language,
    HasDegree => has_degree: Bool,
    Degree1 => degree_1: Choice(Vocabulary::Degree),
    Degree1Name => degree_1_name: Plain,
    Degree1Status => degree_1_status: Choice(Vocabulary::DegreeStatus),
    Degree2 => degree_2: Choice(Vocabulary::Degree),
    Degree2Name => degree_2_name: Plain,
    Degree2Status => degree_2_status: Choice(Vocabulary::DegreeStatus),
    Degree3 => degree_3: Choice(Vocabulary::Degree),
    Degree3Name => degree_3_name: Plain,
    Degree3Status => degree_3_status: Choice(Vocabulary::DegreeStatus),
    Linkedin => linkedin: FieldKind::Linkedin,
    MvParticipation => mv_participation: Bool,
    MvProgram1 => mv_program_1: Choice(Vocabulary::MvProgram),
    MvProgram1Year => mv_program_1_year: Plain,
    MvProgram2 => mv_program_2: Choice(Vocabulary::MvProgram),
    MvProgram2Year => mv_program_2_year: Plain,
    MvProgram3 => mv_program_3: Choice(Vocabulary::MvProgram),
    MvProgram3Year => mv_program_3_year: Plain,
    MlkProgram => mlk_program: Bool,
    FulbrightSeminar => fulbright_seminar: Bool,
    Occupation => occupation: Choice(Vocabulary::Occupation),
    Company => company: Plain,
    Sector => sector: Choice(Vocabulary::Sector),
    Role => role: Choice(Vocabulary::Role),
    RoleDescription => role_description: Plain,
    ExperienceSector => experience_sector: Choice(Vocabulary::Sector),
    ExperienceDuration => experience_duration: Choice(Vocabulary::ExperienceDuration),
    ResumeLink => resume_link: Plain,
    PhotoLink => photo_link: Plain,
    Tag => tag: Plain,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = TalentosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == s)
            .ok_or_else(|| TalentosError::Import(format!("unknown field '{s}'")))
    }
}
