//! Serialization of object graphs.
//!
//! A call walks the graph once and produces a tagged intermediate
//! representation ([`Node`]). Objects are numbered by first visit; meeting an
//! object again yields a back reference to that number, so shared objects
//! stay shared and cycles stay finite. A [`Strategy`] turns the
//! representation into its output form and back.
//!
//! Restoring goes the other way. Plain objects are created blank from the
//! [`TypeRegistry`](knot_object::TypeRegistry) and filled property by
//! property. Date/time values are rebuilt from their whole property map and
//! fixed-size collections from their element count.

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod config;
mod driver;
mod error;
mod ir;
mod serializer;
mod tree;
mod walker;

pub mod strategy;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use config::{Limits, SerializerConfig, UnknownPropertyPolicy};
pub use error::{Error, LimitError, SerializeError, StrategyError, UnserializeError};
pub use ir::{FIXED_PARENT, Node, Scalar, ScalarKind};
pub use serializer::{NativeSerializer, Serializer};
pub use strategy::{NativeStrategy, Strategy};
pub use tree::Tree;

#[cfg(feature = "json")]
pub use serializer::JsonSerializer;
#[cfg(feature = "json")]
pub use strategy::JsonStrategy;

#[cfg(feature = "xml")]
pub use serializer::XmlSerializer;
#[cfg(feature = "xml")]
pub use strategy::XmlStrategy;

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "json", feature = "xml"))]
mod tests;
