pub mod profile;

pub use profile::{Field, FieldKind, Profile};
