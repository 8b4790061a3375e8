//! Runtime table of the object types a serializer can rebuild.
//!
//! ## Menu
//!
//! - [`TypeMeta`]: how to rebuild one type, see [`Restore`].
//! - [`ObjectType`]: a statically known type that provides its own `TypeMeta`.
//! - [`TypeRegistry`]: name → `TypeMeta` table.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`]. Registration is collected with the
//! [`inventory`](https://docs.rs/inventory) crate; on platforms it does not
//! support, `auto_register` is a no-op that returns `false`.

// -----------------------------------------------------------------------------
// Modules

mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_meta::{ObjectType, Restore, TypeMeta};
pub use type_registry::TypeRegistry;
