//! Per-field formatters.
//!
//! Each formatter maps a raw survey answer onto a canonical value: a member
//! of the field's vocabulary, or the field's fixed default. Formatters never
//! fail on bad input, and every formatter is idempotent on its own output.

use std::sync::LazyLock;

use phf::phf_set;
use regex::Regex;
use talentos_match::{normalize, Matcher};
use url::Url;

use crate::cell;
use crate::models::{Field, FieldKind};
use crate::options::{Options, Vocabulary};

/// Answer used for yes/no fields that resolve to nothing.
pub const BOOL_DEFAULT: &str = "No";

/// Level used for languages the candidate did not rate.
pub const LANGUAGE_DEFAULT: &str = "No lo habla";

/// Canonical department that every "Bogotá" municipality belongs to.
pub const BOGOTA_DEPARTMENT: &str = "Bogotá D.C.";

/// Words kept lowercase inside a title-cased name.
static TITLE_STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "de", "y", "en", "a", "el", "la", "los", "las", "del", "al", "con",
};

/// `linkedin.com/...` after protocol, `www.` and country subdomain.
static RE_LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?(?:[a-z]{2}\.)?(linkedin\.com(?:/.*)?)$").unwrap()
});

/// Formats raw answers against an options snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    options: &'a Options,
    matcher: Matcher,
}

impl<'a> Formatter<'a> {
    pub fn new(options: &'a Options, matcher: Matcher) -> Self {
        Self { options, matcher }
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// Format `raw` with the formatter registered for `field`.
    ///
    /// Place fields are only trimmed here; they are resolved in pairs by
    /// [`Formatter::place`].
    pub fn apply(&self, field: Field, raw: &str) -> String {
        match field.kind() {
            FieldKind::Plain | FieldKind::Place => plain(raw),
            FieldKind::Bool => self.bool_field(raw),
            FieldKind::Title => title(raw),
            FieldKind::Choice(vocabulary) => self.choice(vocabulary, raw),
            FieldKind::Motivations => self.motivations(raw),
            FieldKind::Language => self.language_level(raw),
            FieldKind::Linkedin => linkedin(raw),
            FieldKind::DocumentNumber => document_number(raw),
            FieldKind::Phone => phone(raw),
            FieldKind::Date => cell::format_birth_date(raw),
        }
    }

    /// Closest entry of `vocabulary`, or empty.
    pub fn choice(&self, vocabulary: Vocabulary, raw: &str) -> String {
        self.matcher
            .closest_match(self.options.vocabulary(vocabulary), raw, "")
    }

    /// "Sí" or "No"; anything unrecognised is "No".
    pub fn bool_field(&self, raw: &str) -> String {
        self.matcher
            .closest_match(self.options.vocabulary(Vocabulary::Bool), raw, BOOL_DEFAULT)
    }

    /// Resolve a department and municipality pair.
    ///
    /// The department is resolved first and the municipality only within
    /// that department's list. A municipality mentioning Bogotá forces the
    /// Bogotá D.C. department whatever department was answered.
    pub fn place(&self, department: &str, municipality: &str) -> (String, String) {
        let departments = self.options.departments();
        let department = if normalize(municipality).contains("bogota") {
            BOGOTA_DEPARTMENT
        } else {
            department
        };

        let department = self.matcher.closest_match(&departments, department, "");
        if department.is_empty() {
            return (String::new(), String::new());
        }
        let municipality =
            self.matcher
                .closest_match(self.options.municipalities(&department), municipality, "");
        (department, municipality)
    }

    /// Compact CEFR code for a language level answer.
    ///
    /// Answers already given as a code are kept; verbose labels such as
    /// "Intermedio alto (B2)" are mapped to their code by position.
    pub fn language_level(&self, raw: &str) -> String {
        let codes = self.options.vocabulary(Vocabulary::LanguageLevel);
        let folded = normalize(raw);
        if let Some(code) = codes.iter().find(|c| normalize(c) == folded) {
            return code.clone();
        }

        let labels = self.options.vocabulary(Vocabulary::LanguageLevelLabels);
        self.matcher
            .closest_index(labels, raw)
            .and_then(|i| codes.get(i))
            .cloned()
            .unwrap_or_else(|| LANGUAGE_DEFAULT.to_string())
    }

    /// Multi-select answer: each comma-separated item is resolved, unknown
    /// items are dropped and repeats collapse.
    pub fn motivations(&self, raw: &str) -> String {
        let vocabulary = self.options.vocabulary(Vocabulary::Motivations);
        let mut selected: Vec<String> = Vec::new();
        for item in raw.split(',') {
            let resolved = self.matcher.closest_match(vocabulary, item, "");
            if !resolved.is_empty() && !selected.contains(&resolved) {
                selected.push(resolved);
            }
        }
        selected.join(",")
    }
}

pub fn plain(raw: &str) -> String {
    raw.trim().to_string()
}

/// Title-case a person's name.
///
/// The name is normalized first, so accents and punctuation are dropped.
/// Spanish particles ("de", "la", "del", ...) stay lowercase unless they open
/// the name.
pub fn title(raw: &str) -> String {
    let folded = normalize(raw);
    let words: Vec<&str> = folded.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() < 2 {
        return capitalize(&folded);
    }

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && TITLE_STOP_WORDS.contains(*word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Canonical `https://www.linkedin.com/in/<slug>` profile URL, or empty.
pub fn linkedin(raw: &str) -> String {
    let raw = raw.trim();
    let lower = raw.to_lowercase();
    if !lower.contains("https") && !lower.contains("www") {
        return String::new();
    }

    let without_query = raw.split(['?', '#']).next().unwrap_or_default();
    let Some(caps) = RE_LINKEDIN.captures(without_query) else {
        return String::new();
    };
    let Some(decoded) = percent_decode(&caps[1]) else {
        return String::new();
    };
    // Escapes may hide a query, a fragment, a trailing slash or another escape.
    let rest = decoded
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if rest.contains('%') {
        return String::new();
    }

    let (host, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    if !path.starts_with("/in/") || path.len() <= "/in/".len() {
        return String::new();
    }

    let url = format!("https://www.{}{path}", host.to_lowercase());
    match Url::parse(&url) {
        Ok(_) => url,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Discarding unparsable LinkedIn URL");
            String::new()
        }
    }
}

/// Percent-decoding for URL paths. Invalid escapes are kept verbatim.
fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                result.push(byte);
                i += 3;
                continue;
            }
        }
        result.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(result).ok()
}

/// Document numbers compare without spaces or punctuation.
pub fn document_number(raw: &str) -> String {
    normalize(raw).replace(' ', "")
}

pub fn phone(raw: &str) -> String {
    normalize(raw)
}
