//! Text normalization and fuzzy matching against fixed option lists.
//!
//! Free-text survey answers are folded to a comparable form by
//! [`normalize`] and then resolved onto a canonical vocabulary by a
//! [`Matcher`].

pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use matcher::{closest_match, fuzzy_eq, Matcher, Scored};
pub use normalize::{normalize, normalize_opt};
pub use similarity::ratio;
