//! The value model of a serializable object graph.
//!
//! - [`Value`]: a dynamically typed value; objects are referenced by
//!   [`ObjectId`] handles into an [`ObjectHeap`].
//! - [`Object`]: the capability a Rust type needs to live in the heap,
//!   usually generated with [`#[derive(Object)]`](derive::Object).
//! - [`TypeRegistry`]: how each named type is rebuilt, see [`Restore`].
//! - [`builtin`]: date/time value objects and [`FixedArray`].
//!
//! # Example
//!
//! ```
//! use knot_object::{ObjectHeap, Value, derive::Object};
//!
//! #[derive(Object, Default)]
//! struct Person {
//!     name: String,
//!     friend: Option<knot_object::ObjectId>,
//! }
//!
//! let mut heap = ObjectHeap::new();
//! let alice = heap.insert(Person { name: "Alice".into(), friend: None });
//! let bob = heap.insert(Person { name: "Bob".into(), friend: Some(alice) });
//!
//! let bob = heap.get(bob).unwrap();
//! assert_eq!(bob.type_name(), "Person");
//! assert_eq!(bob.field("friend"), Some(Value::Object(alice)));
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// The derive resolves this crate through the caller's manifest; inside this
// crate (and its doc tests) that is `::knot_object`.
extern crate self as knot_object;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod convert;
mod error;
mod heap;
mod object;
mod properties;
mod value;

pub mod builtin;
pub mod registry;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use array::{Array, Iter};
pub use builtin::{DateInterval, DatePeriod, DateTime, DateTimeImmutable, DateTimeZone, FixedArray, Zone};
pub use convert::{ConvertError, FromValue, ToValue};
pub use error::{FieldError, FixedIndexError, HydrateError};
pub use heap::{ObjectHeap, ObjectId};
pub use knot_object_derive as derive;
pub use object::{FixedCollection, Object, ObjectKind};
pub use properties::Properties;
pub use registry::{ObjectType, Restore, TypeMeta, TypeRegistry};
pub use value::{Callable, Key, Resource, Value, ValueKind};

// -----------------------------------------------------------------------------
// Tests
