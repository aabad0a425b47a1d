use crate::normalize::normalize;
use crate::similarity::ratio;

/// Minimum similarity (0.0–1.0) for an option to be considered a match.
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// How many ranked options are kept before picking the best one.
pub const DEFAULT_CANDIDATES: usize = 2;

/// Similarity at or above which two strings count as "the same answer".
pub const FUZZY_EQ_THRESHOLD: f64 = 0.9;

/// An option that cleared the cutoff, with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<'o> {
    pub option: &'o str,
    pub index: usize,
    pub score: f64,
}

/// Resolves free text onto one entry of an ordered option list.
///
/// Ranking is by similarity of the normalized forms, highest first. Ties
/// keep the order of the option list, so the earlier option wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    cutoff: f64,
    candidates: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            candidates: DEFAULT_CANDIDATES,
        }
    }
}

impl Matcher {
    /// Cutoff is clamped to `[0.0, 1.0]` and at least one candidate is kept.
    /// A NaN cutoff falls back to [`DEFAULT_CUTOFF`].
    pub fn new(cutoff: f64, candidates: usize) -> Self {
        let cutoff = if cutoff.is_nan() {
            tracing::warn!(default = DEFAULT_CUTOFF, "NaN match cutoff, using default");
            DEFAULT_CUTOFF
        } else {
            cutoff.clamp(0.0, 1.0)
        };
        Self {
            cutoff,
            candidates: candidates.max(1),
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// Ranked options whose similarity to `candidate` clears the cutoff.
    ///
    /// At most `candidates` entries are returned. An empty candidate (after
    /// normalization) matches nothing, and neither do options that
    /// normalize to the empty string.
    pub fn closest_matches<'o, S: AsRef<str>>(
        &self,
        options: &'o [S],
        candidate: &str,
    ) -> Vec<Scored<'o>> {
        let needle = normalize(candidate);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<Scored<'o>> = options
            .iter()
            .enumerate()
            .filter_map(|(index, option)| {
                let option = option.as_ref();
                let folded = normalize(option);
                if folded.is_empty() {
                    return None;
                }
                let score = ratio(&needle, &folded);
                (score >= self.cutoff).then_some(Scored {
                    option,
                    index,
                    score,
                })
            })
            .collect();

        // Stable sort: equal scores stay in option order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.candidates);
        scored
    }

    /// Best option for `candidate`, or `default` when nothing clears the cutoff.
    pub fn closest_match<S: AsRef<str>>(
        &self,
        options: &[S],
        candidate: &str,
        default: &str,
    ) -> String {
        match self.closest_matches(options, candidate).first() {
            Some(best) => {
                tracing::trace!(
                    candidate,
                    option = best.option,
                    score = best.score,
                    "Closest match"
                );
                best.option.to_string()
            }
            None => {
                if !candidate.trim().is_empty() {
                    tracing::debug!(candidate, default, "No option cleared the cutoff");
                }
                default.to_string()
            }
        }
    }

    /// Index of the best option, for callers that map onto a parallel list.
    pub fn closest_index<S: AsRef<str>>(
        &self,
        options: &[S],
        candidate: &str,
    ) -> Option<usize> {
        self.closest_matches(options, candidate)
            .first()
            .map(|best| best.index)
    }
}

/// [`Matcher::closest_match`] with the default cutoff.
pub fn closest_match<S: AsRef<str>>(options: &[S], candidate: &str, default: &str) -> String {
    Matcher::default().closest_match(options, candidate, default)
}

/// Whether two answers are the same up to typos, accents and casing.
pub fn fuzzy_eq(a: &str, b: &str) -> bool {
    ratio(&normalize(a), &normalize(b)) >= FUZZY_EQ_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    const YES_NO: [&str; 2] = ["Sí", "No"];

    #[test]
    fn accent_and_case_insensitive() {
        assert_eq!(closest_match(&YES_NO, "si", "No"), "Sí");
        assert_eq!(closest_match(&YES_NO, "SI", "No"), "Sí");
        assert_eq!(closest_match(&YES_NO, "no", ""), "No");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(closest_match(&YES_NO, "xyz123", "No"), "No");
        assert_eq!(closest_match(&YES_NO, "xyz123", ""), "");
    }

    #[test]
    fn empty_candidate_is_default() {
        assert_eq!(closest_match(&YES_NO, "", "No"), "No");
        assert_eq!(closest_match(&YES_NO, "  ¿? ", "No"), "No");
    }

    #[test]
    fn empty_options() {
        let options: [&str; 0] = [];
        assert_eq!(closest_match(&options, "si", "x"), "x");
    }

    #[test]
    fn tolerates_typos() {
        let options = ["Cédula de ciudadanía", "Cédula de extranjería", "Pasaporte"];
        assert_eq!(
            closest_match(&options, "cedula de ciudadnia", ""),
            "Cédula de ciudadanía"
        );
        assert_eq!(closest_match(&options, "PASAPORTE", ""), "Pasaporte");
    }

    #[test]
    fn tie_keeps_option_order() {
        // Both options normalize to "si".
        let options = ["Si", "Sí"];
        assert_eq!(closest_match(&options, "si", ""), "Si");
        let options = ["Sí", "Si"];
        assert_eq!(closest_match(&options, "si", ""), "Sí");
    }

    #[test]
    fn ranked_and_truncated() {
        let options = ["Masculino", "Femenino", "No binario", "Otro"];
        let matcher = Matcher::new(0.0, 2);
        let ranked = matcher.closest_matches(&options, "femenina");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].option, "Femenino");
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn stricter_cutoff_rejects_more() {
        let options = ["Femenino"];
        assert_eq!(Matcher::new(0.6, 2).closest_match(&options, "femen", ""), "Femenino");
        assert_eq!(Matcher::new(0.95, 2).closest_match(&options, "femen", ""), "");
    }

    #[test]
    fn closest_index_reports_position() {
        let options = ["Principiante (A0)", "Básico (A1)"];
        assert_eq!(Matcher::default().closest_index(&options, "basico a1"), Some(1));
        assert_eq!(Matcher::default().closest_index(&options, "zzz"), None);
    }

    #[test]
    fn new_clamps_arguments() {
        let m = Matcher::new(3.0, 0);
        assert_eq!(m.cutoff(), 1.0);
        assert_eq!(m.candidates(), 1);
        assert_eq!(Matcher::new(f64::NEG_INFINITY, 2).cutoff(), 0.0);
    }

    #[test]
    fn nan_cutoff_uses_default() {
        let m = Matcher::new(f64::NAN, 2);
        assert_eq!(m.cutoff(), DEFAULT_CUTOFF);
        assert_eq!(m.closest_match(&["Sí", "No"], "si", "No"), "Sí");
    }

    #[test]
    fn fuzzy_eq_threshold() {
        assert!(fuzzy_eq("Sí", "si"));
        assert!(fuzzy_eq("Cédula de ciudadanía", "cedula de ciudadania."));
        assert!(!fuzzy_eq("Sí", "No"));
        assert!(!fuzzy_eq("Masculino", "Femenino"));
    }
}
