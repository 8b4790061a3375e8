use thiserror::Error;

use crate::convert::ConvertError;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Error

/// Failure of [`Object::set_field`](crate::Object::set_field).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum FieldError {
    /// No declared field of this name, at this level or above.
    ///
    /// The rejected value is handed back so the caller can store it elsewhere.
    #[error("No declared field accepts the value")]
    NotFound(Value),

    #[error("Field `{field}` rejected the value: {source}")]
    Convert {
        field: &'static str,
        #[source]
        source: ConvertError,
    },

    #[error("Objects of type `{0}` cannot be modified field by field")]
    Immutable(&'static str),
}

/// Failure of a whole-map hydration function.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum HydrateError {
    #[error("Property `{0}` is missing")]
    Missing(&'static str),

    #[error("Property `{name}` has the wrong type: {source}")]
    Convert {
        name: &'static str,
        #[source]
        source: ConvertError,
    },

    #[error("Property `{name}` is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Index outside a fixed-size collection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Index {index} is out of bounds for a fixed collection of size {size}")]
pub struct FixedIndexError {
    pub index: usize,
    pub size: usize,
}
