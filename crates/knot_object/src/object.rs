use std::any::Any;

use crate::error::{FieldError, FixedIndexError};
use crate::properties::Properties;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ObjectKind

/// How the serializer treats an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectKind {
    /// Properties are read and written field by field.
    #[default]
    Plain,
    /// A value object restored as a whole from its property map.
    Temporal,
    /// A fixed-size indexable collection, see [`FixedCollection`].
    FixedArray,
    /// Can never be serialized.
    Unsupported,
}

// -----------------------------------------------------------------------------
// Object

/// The capability an object needs to take part in a value graph.
///
/// An object is organized in *levels*: the value itself is the most-derived
/// level and [`parent`](Object::parent) exposes the next one up. Each level
/// declares its own fields through [`field_names`](Object::field_names).
///
/// Implementations are normally generated with
/// [`#[derive(Object)]`](crate::derive::Object).
///
/// # Examples
///
/// ```
/// use knot_object::{Object, Value, derive::Object};
///
/// #[derive(Object, Default)]
/// struct Base {
///     id: i64,
/// }
///
/// #[derive(Object, Default)]
/// struct User {
///     name: String,
///     #[object(parent)]
///     base: Base,
/// }
///
/// let mut user = User::default();
/// user.set_field("id", Value::Int(7)).unwrap();
///
/// assert_eq!(user.base.id, 7);
/// assert_eq!(user.field_names(), ["name"]);
/// assert_eq!(user.parent().unwrap().field_names(), ["id"]);
/// ```
pub trait Object: Any + Send + Sync + 'static {
    /// The name this type is registered and serialized under.
    fn type_name(&self) -> &'static str;

    #[inline]
    fn kind(&self) -> ObjectKind {
        ObjectKind::Plain
    }

    /// Fields declared by this level, in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Reads a declared field of this level or of a parent level.
    fn field(&self, name: &str) -> Option<Value>;

    /// Writes a declared field of this level or of a parent level.
    ///
    /// Returns [`FieldError::NotFound`] carrying `value` when no level
    /// declares `name`.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), FieldError>;

    #[inline]
    fn parent(&self) -> Option<&dyn Object> {
        None
    }

    #[inline]
    fn parent_mut(&mut self) -> Option<&mut dyn Object> {
        None
    }

    /// The store for properties no level declares.
    #[inline]
    fn dynamic_fields(&self) -> Option<&Properties> {
        None
    }

    #[inline]
    fn dynamic_fields_mut(&mut self) -> Option<&mut Properties> {
        None
    }

    /// Called once all properties of a restored object are set.
    #[inline]
    fn wakeup(&mut self) {}

    #[inline]
    fn as_fixed(&self) -> Option<&dyn FixedCollection> {
        None
    }

    #[inline]
    fn as_fixed_mut(&mut self) -> Option<&mut dyn FixedCollection> {
        None
    }
}

impl dyn Object {
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}

// -----------------------------------------------------------------------------
// FixedCollection

/// A collection whose size is fixed at construction.
pub trait FixedCollection {
    fn size(&self) -> usize;

    fn element(&self, index: usize) -> Option<Value>;

    fn set_element(&mut self, index: usize, value: Value) -> Result<(), FixedIndexError>;
}

// -----------------------------------------------------------------------------
// Tests
