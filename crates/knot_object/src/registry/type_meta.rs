use std::fmt;

use crate::error::HydrateError;
use crate::object::Object;
use crate::properties::Properties;

// -----------------------------------------------------------------------------
// Restore

/// How an object of a registered type is rebuilt.
#[derive(Clone, Copy)]
pub enum Restore {
    /// Create a blank instance without running construction logic,
    /// then assign properties one by one.
    Blank(fn() -> Box<dyn Object>),
    /// Rebuild the instance from its whole property map.
    Hydrate(fn(&Properties) -> Result<Box<dyn Object>, HydrateError>),
    /// Create an instance pre-sized to the element count, then fill it.
    Sized(fn(usize) -> Box<dyn Object>),
    /// The type is known but can never be restored.
    Unsupported,
}

impl Restore {
    /// A short name for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Restore::Blank(_) => "blank",
            Restore::Hydrate(_) => "hydrate",
            Restore::Sized(_) => "sized",
            Restore::Unsupported => "unsupported",
        }
    }
}

impl fmt::Debug for Restore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// TypeMeta

/// Registry entry of one object type.
///
/// Usually generated through [`ObjectType::type_meta`] by
/// [`#[derive(Object)]`](crate::derive::Object).
///
/// # Examples
///
/// ```
/// use knot_object::{FixedArray, Restore, TypeMeta};
///
/// let meta = TypeMeta::with_size("Slots", |n| Box::new(FixedArray::new(n)));
/// assert_eq!(meta.name(), "Slots");
/// assert!(matches!(meta.restore(), Restore::Sized(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeMeta {
    name: &'static str,
    restore: Restore,
}

impl TypeMeta {
    #[inline]
    pub const fn new(name: &'static str, restore: Restore) -> Self {
        Self { name, restore }
    }

    #[inline]
    pub const fn with_blank(name: &'static str, blank: fn() -> Box<dyn Object>) -> Self {
        Self::new(name, Restore::Blank(blank))
    }

    #[inline]
    pub const fn with_hydrate(
        name: &'static str,
        hydrate: fn(&Properties) -> Result<Box<dyn Object>, HydrateError>,
    ) -> Self {
        Self::new(name, Restore::Hydrate(hydrate))
    }

    #[inline]
    pub const fn with_size(name: &'static str, sized: fn(usize) -> Box<dyn Object>) -> Self {
        Self::new(name, Restore::Sized(sized))
    }

    #[inline]
    pub const fn unsupported(name: &'static str) -> Self {
        Self::new(name, Restore::Unsupported)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn restore(&self) -> Restore {
        self.restore
    }
}

// -----------------------------------------------------------------------------
// ObjectType

/// A statically known object type.
///
/// Implemented by [`#[derive(Object)]`](crate::derive::Object) and by the
/// built-in types; used by [`TypeRegistry::register`](crate::TypeRegistry::register).
pub trait ObjectType: Object + Sized {
    /// The name this type is registered and serialized under.
    const TYPE_NAME: &'static str;

    fn type_meta() -> TypeMeta;
}
