//! Enum-constrained classifications extracted from reviews.
//!
//! Every label set the model may answer with implements [`Classification`],
//! which ties the Rust enum to its wire values and to the [`EnumField`]
//! used when asking the model for structured output.

pub mod diagnosis;
pub mod schema;
pub mod sentiment;

use schema::EnumField;

/// A closed set of labels the model must choose from.
pub trait Classification: Copy + Sized + 'static {
    /// Field name in the structured-output object.
    const FIELD: &'static str;
    /// Guidance shown to the model for this field.
    const DESCRIPTION: &'static str;

    /// All variants, in declaration order.
    fn variants() -> &'static [Self];

    /// Wire value of this variant.
    fn as_str(&self) -> &'static str;

    /// Schema field constraining the model to this label set.
    fn enum_field() -> EnumField {
        EnumField::new(
            Self::FIELD,
            Self::DESCRIPTION,
            Self::variants().iter().map(|v| v.as_str()),
        )
    }
}
