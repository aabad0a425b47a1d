//! Import of survey spreadsheet rows into profiles.
//!
//! Each row is read through the column mapping of an [`ImportForm`], every
//! field is formatted onto its vocabulary, and the resulting profiles are
//! split into new candidates and candidates already in the bank.

use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use talentos_match::{normalize, Matcher};

use crate::cell;
use crate::config::{ColumnRange, ImportForm};
use crate::format::Formatter;
use crate::ids;
use crate::models::{Field, Profile};
use crate::options::Options;

/// Tag added when the document number and its confirmation disagree.
pub const TAG_ID_MISMATCH: &str = "IDDOC_UNMATCH";

/// Resume extension assumed when the link does not reveal one.
const DEFAULT_RESUME_EXTENSION: &str = ".pdf";

/// Profiles read from one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportBatch {
    /// Candidates not yet in the bank.
    pub fresh: Vec<Profile>,
    /// Candidates whose profile key is already in the bank.
    pub already_imported: Vec<Profile>,
    /// Rows without a name or document type.
    pub skipped: usize,
}

/// First non-blank cell of `range` in `row`.
///
/// Blank when the range starts past the end of the row.
pub fn field_value(row: &[String], range: ColumnRange) -> String {
    let (start, end) = range.bounds();
    (start..=end)
        .map_while(|i| row.get(i))
        .map(|raw| cell::coerce_cell(raw))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Turns rows of one import form into profiles.
#[derive(Debug, Clone)]
pub struct Importer<'a> {
    form: &'a ImportForm,
    formatter: Formatter<'a>,
    columns: Vec<(Field, ColumnRange)>,
    today: NaiveDate,
}

impl<'a> Importer<'a> {
    /// Column keys that do not name a field are ignored with a warning.
    pub fn new(form: &'a ImportForm, options: &'a Options, matcher: Matcher) -> Self {
        let columns = form
            .columns
            .iter()
            .filter_map(|(key, range)| match key.parse::<Field>() {
                Ok(field) => Some((field, *range)),
                Err(_) => {
                    tracing::warn!(form = %form.name, column = %key, "Ignoring unknown column key");
                    None
                }
            })
            .collect();

        Self {
            form,
            formatter: Formatter::new(options, matcher),
            columns,
            today: Local::now().date_naive(),
        }
    }

    /// Reference date for computing ages.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn form(&self) -> &ImportForm {
        self.form
    }

    fn range_of(&self, field: Field) -> Option<ColumnRange> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, range)| *range)
    }

    /// Build a profile from one row.
    ///
    /// Fields without a column are formatted from a blank answer, so they
    /// still take their default (e.g. "No", "No lo habla").
    pub fn profile_from_row(&self, row: &[String]) -> Profile {
        let mut profile = Profile::default();
        for field in Field::ALL {
            let raw = self
                .range_of(*field)
                .map(|range| field_value(row, range))
                .unwrap_or_default();
            profile.set(*field, self.formatter.apply(*field, &raw));
        }

        let (department, municipality) = self
            .formatter
            .place(&profile.birth_department, &profile.birth_municipality);
        profile.birth_department = department;
        profile.birth_municipality = municipality;

        let (department, municipality) = self
            .formatter
            .place(&profile.residence_department, &profile.residence_municipality);
        profile.residence_department = department;
        profile.residence_municipality = municipality;

        if !profile.birth_date.is_empty() {
            profile.age = cell::age_on(cell::parse_birth_date(&profile.birth_date), self.today);
        }

        if normalize(&profile.id_document_number)
            != normalize(&profile.id_document_number_confirmation)
        {
            add_tag(&mut profile.tag, TAG_ID_MISMATCH);
        }

        name_files(&mut profile);
        profile
    }

    /// Import every answer row, separating candidates already in `existing`.
    #[tracing::instrument(name = "import_rows", skip_all, fields(form = %self.form.name, rows = rows.len()))]
    pub fn import_rows(&self, rows: &[Vec<String>], existing: &[Profile]) -> ImportBatch {
        let known: HashSet<String> = existing.iter().map(ids::profile_key).collect();
        let mut batch = ImportBatch::default();

        for row in rows.iter().skip(self.form.header_rows) {
            let profile = self.profile_from_row(row);
            if profile.full_name.is_empty() || profile.id_document_type.is_empty() {
                batch.skipped += 1;
                continue;
            }
            if known.contains(&ids::profile_key(&profile)) {
                batch.already_imported.push(profile);
            } else {
                batch.fresh.push(profile);
            }
        }

        tracing::info!(
            fresh = batch.fresh.len(),
            already_imported = batch.already_imported.len(),
            skipped = batch.skipped,
            "Import finished"
        );
        batch
    }
}

/// Storage names for the resume and photo of a profile that links them.
fn name_files(profile: &mut Profile) {
    if profile.full_name.is_empty() || profile.id_document_number.is_empty() {
        return;
    }
    let extension = match ids::extension_of(&profile.resume_link) {
        ext if ext.is_empty() => DEFAULT_RESUME_EXTENSION.to_string(),
        ext => ext,
    };
    let (resume, photo) = ids::profile_file_names(profile, &extension);
    if !profile.resume_link.is_empty() {
        profile.resume_name = resume;
    }
    if !profile.photo_link.is_empty() {
        profile.photo_name = photo;
    }
}

fn add_tag(tags: &mut String, tag: &str) {
    if tags.split(',').any(|t| t.trim() == tag) {
        return;
    }
    if !tags.is_empty() {
        tags.push(',');
    }
    tags.push_str(tag);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn form() -> ImportForm {
        let columns: BTreeMap<String, ColumnRange> = [
            ("full_name", ColumnRange::Single(0)),
            ("id_document_type", ColumnRange::Single(1)),
            ("id_document_number", ColumnRange::Single(2)),
            ("id_document_number_confirmation", ColumnRange::Single(3)),
            ("residence_department", ColumnRange::Single(4)),
            ("residence_municipality", ColumnRange::Single(5)),
            ("gender", ColumnRange::Span([6, 7])),
            ("birth_date", ColumnRange::Single(8)),
            ("not_a_field", ColumnRange::Single(9)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        ImportForm {
            name: "Prueba".into(),
            sheet_id: String::new(),
            range_name: String::new(),
            header_rows: 1,
            columns,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn field_value_first_non_blank() {
        let r = row(&["a", " ", "nan", "d"]);
        assert_eq!(field_value(&r, ColumnRange::Single(0)), "a");
        assert_eq!(field_value(&r, ColumnRange::Span([1, 3])), "d");
        assert_eq!(field_value(&r, ColumnRange::Span([1, 2])), "");
    }

    #[test]
    fn field_value_past_row_end_is_blank() {
        let r = row(&["a"]);
        assert_eq!(field_value(&r, ColumnRange::Single(5)), "");
        assert_eq!(field_value(&r, ColumnRange::Span([0, 9])), "a");
    }

    #[test]
    fn field_value_coerces_cells() {
        let r = row(&["1023456789.0"]);
        assert_eq!(field_value(&r, ColumnRange::Single(0)), "1023456789");
    }

    #[test]
    fn profile_from_row_formats_fields() {
        let options = Options::default();
        let form = form();
        let importer = Importer::new(&form, &options, Matcher::default()).with_today(today());
        let profile = importer.profile_from_row(&row(&[
            "juan de la torre",
            "cedula de ciudadania",
            "1.023.456",
            "1023456",
            "antioquia",
            "medellin",
            "",
            "masculino",
            "2000-06-16 00:00:00",
        ]));

        assert_eq!(profile.full_name, "Juan de la Torre");
        assert_eq!(profile.id_document_type, "Cédula de ciudadanía");
        assert_eq!(profile.id_document_number, "1023456");
        assert_eq!(profile.residence_department, "Antioquia");
        assert_eq!(profile.residence_municipality, "Medellín");
        assert_eq!(profile.gender, "Masculino");
        assert_eq!(profile.birth_date, "16/06/2000");
        assert_eq!(profile.age, Some(23));
        assert_eq!(profile.tag, "");
        // Unmapped fields take their defaults.
        assert_eq!(profile.mlk_program, "No");
        assert_eq!(profile.english_level, "No lo habla");
        assert_eq!(profile.birth_department, "");
    }

    #[test]
    fn document_mismatch_is_tagged() {
        let options = Options::default();
        let form = form();
        let importer = Importer::new(&form, &options, Matcher::default());
        let profile =
            importer.profile_from_row(&row(&["Ana Gómez", "Pasaporte", "AB123", "AB124"]));
        assert_eq!(profile.tag, TAG_ID_MISMATCH);
    }

    #[test]
    fn import_rows_splits_and_skips() {
        let options = Options::default();
        let form = form();
        let importer = Importer::new(&form, &options, Matcher::default()).with_today(today());

        let existing = vec![Profile {
            full_name: "Ana Gomez".into(),
            id_document_number: "1023456".into(),
            ..Default::default()
        }];

        let rows = vec![
            row(&["Nombre", "Tipo", "Número", "Confirmación"]),
            row(&["ana gómez", "cédula de ciudadanía", "1 023 456", "1023456"]),
            row(&["Luis Pérez", "pasaporte", "X99", "X99"]),
            row(&["", "pasaporte", "X98", "X98"]),
            row(&["Sin Documento", "???", "1", "1"]),
        ];

        let batch = importer.import_rows(&rows, &existing);
        assert_eq!(batch.already_imported.len(), 1);
        assert_eq!(batch.already_imported[0].full_name, "Ana Gomez");
        assert_eq!(batch.fresh.len(), 1);
        assert_eq!(batch.fresh[0].full_name, "Luis Perez");
        assert_eq!(batch.skipped, 2);
    }

    #[test]
    fn linked_files_are_named() {
        let options = Options::default();
        let mut form = form();
        form.columns.insert("resume_link".into(), ColumnRange::Single(9));
        form.columns.insert("photo_link".into(), ColumnRange::Single(10));
        let importer = Importer::new(&form, &options, Matcher::default());

        let mut cells = vec![""; 11];
        cells[0] = "Ana Gómez";
        cells[1] = "Pasaporte";
        cells[2] = "AB123";
        cells[9] = "https://drive.google.com/open?id=xyz";
        let profile = importer.profile_from_row(&row(&cells));
        let doc = ids::deterministic_id("ab123");
        assert_eq!(profile.resume_name, format!("agomez-{doc}.pdf"));
        assert_eq!(profile.photo_name, "");

        cells[9] = "https://example.org/cv.DOCX";
        cells[10] = "https://example.org/foto.png";
        let profile = importer.profile_from_row(&row(&cells));
        assert_eq!(profile.resume_name, format!("agomez-{doc}.docx"));
        assert_eq!(profile.photo_name, format!("agomez-{doc}.jpg"));
    }

    #[test]
    fn add_tag_does_not_repeat() {
        let mut tags = String::new();
        add_tag(&mut tags, "A");
        add_tag(&mut tags, "B");
        add_tag(&mut tags, "A");
        assert_eq!(tags, "A,B");
    }
}
