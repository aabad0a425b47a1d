//! Normalization applied to both sides of every fuzzy comparison.
//!
//! Survey answers arrive with arbitrary casing, accents and punctuation
//! ("¡SÍ!", "Bogotá, D.C.", "Cédula  de ciudadanía"). Matching is done on a
//! folded form that only keeps lowercase ASCII letters, digits and single
//! spaces.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string into its comparable form.
///
/// Steps applied in order:
/// 1. Unicode NFD decomposition, dropping combining marks (accents, tildes)
/// 2. Lowercasing
/// 3. Erasing everything outside `[a-z0-9]` and whitespace
/// 4. Collapsing whitespace runs and trimming
pub fn normalize(s: &str) -> String {
    let s = strip_marks(s);
    let s = s.to_lowercase();
    let s = erase_non_alphanumeric(&s);
    collapse_whitespace(&s)
}

/// [`normalize`] for optional values; `None` folds to the empty string.
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}

// ── Step 1: accent stripping ──────────────────────────────────────────

fn strip_marks(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

// ── Step 3: character filter ──────────────────────────────────────────

fn erase_non_alphanumeric(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect()
}

// ── Step 4: whitespace ────────────────────────────────────────────────

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
