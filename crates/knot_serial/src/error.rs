use thiserror::Error;

use knot_object::{FieldError, FixedIndexError, HydrateError, ObjectId, ValueKind};

// -----------------------------------------------------------------------------
// LimitError

/// A [`Limits`](crate::Limits) bound was exceeded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LimitError {
    #[error("Nesting exceeds the maximum depth of {0}")]
    Depth(usize),

    #[error("Graph exceeds the node budget of {0}")]
    Nodes(usize),
}

// -----------------------------------------------------------------------------
// SerializeError

/// Failure while turning a value graph into the intermediate representation.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializeError {
    /// A callable, a resource handle or an unsupported object was reached.
    #[error("Serialization of {kind} `{name}` is not allowed")]
    Unsupported { kind: ValueKind, name: String },

    #[error("Object {0:?} does not exist in the heap")]
    DanglingObject(ObjectId),

    #[error("Type `{type_name}` does not provide the `{capability}` capability")]
    MissingCapability {
        type_name: &'static str,
        capability: &'static str,
    },

    /// A fixed collection has no element at an index below its size.
    #[error("Type `{type_name}` reports {size} elements but has none at index {index}")]
    MissingElement {
        type_name: &'static str,
        index: usize,
        size: usize,
    },

    #[error(transparent)]
    Limit(#[from] LimitError),
}

// -----------------------------------------------------------------------------
// UnserializeError

/// Failure while rebuilding a value graph from the intermediate representation.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum UnserializeError {
    #[error("Type `{0}` is not registered")]
    UnknownType(String),

    /// A back reference to an index that no object has (yet).
    #[error("Back reference to unknown object index {index}")]
    MalformedReference { index: usize },

    #[error("Type `{0}` cannot be unserialized")]
    UnsupportedType(String),

    #[error("Type `{type_name}` is restored as {expected}, but the input encodes it as {found}")]
    KindMismatch {
        type_name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot rebuild `{type_name}`: {source}")]
    Hydrate {
        type_name: String,
        #[source]
        source: HydrateError,
    },

    #[error("Cannot set property `{name}` of `{type_name}`: {source}")]
    Field {
        type_name: String,
        name: String,
        #[source]
        source: FieldError,
    },

    #[error("Type `{type_name}` has no property `{name}`")]
    UnknownProperty { type_name: String, name: String },

    #[error("Cannot fill `{type_name}`: {source}")]
    FixedIndex {
        type_name: String,
        #[source]
        source: FixedIndexError,
    },

    #[error("Object {0:?} was removed from the heap during restoration")]
    DanglingObject(ObjectId),

    #[error(transparent)]
    Limit(#[from] LimitError),
}

// -----------------------------------------------------------------------------
// StrategyError

/// Failure of a strategy converting between its output and the
/// intermediate representation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrategyError {
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// An object property would be read back as a layout marker.
    #[error("Property `{name}` of `{type_name}` collides with a reserved key")]
    ReservedName { type_name: String, name: String },

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "xml")]
    #[error("XML error: {0}")]
    Xml(String),
}

impl StrategyError {
    #[inline]
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        StrategyError::Malformed(message.into())
    }
}

// -----------------------------------------------------------------------------
// Error

/// Any failure of a [`Serializer`](crate::Serializer) call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Unserialize(#[from] UnserializeError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}
