use std::fmt;

use knot_utils::hash::{self, HashMap};

use crate::builtin::{DateInterval, DatePeriod, DateTime, DateTimeImmutable, DateTimeZone, FixedArray};
use crate::registry::{ObjectType, TypeMeta};

// -----------------------------------------------------------------------------
// TypeRegistry

/// Table of the object types that can be rebuilt, keyed by type name.
///
/// # Example
///
/// ```
/// use knot_object::{Restore, TypeRegistry, derive::Object};
///
/// #[derive(Object, Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// let mut registry = TypeRegistry::new();
/// assert!(registry.register::<Point>());
/// assert!(!registry.register::<Point>());
///
/// let meta = registry.get("Point").unwrap();
/// assert!(matches!(meta.restore(), Restore::Blank(_)));
///
/// // Built-in types are present from the start.
/// assert!(registry.contains("DateTime"));
/// assert!(registry.contains("FixedArray"));
/// ```
pub struct TypeRegistry {
    types: HashMap<&'static str, TypeMeta>,
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    auto_registered: bool,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types.keys()).finish()
    }
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`], without the built-in types.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            types: hash::new_map(),
            auto_registered: false,
        }
    }

    /// Create a registry holding the built-in types:
    ///
    /// - `DateTime` `DateTimeImmutable` `DateTimeZone` `DateInterval`
    /// - `DatePeriod` (registered as unsupported)
    /// - `FixedArray`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<DateTime>();
        registry.register::<DateTimeImmutable>();
        registry.register::<DateTimeZone>();
        registry.register::<DateInterval>();
        registry.register::<DatePeriod>();
        registry.register::<FixedArray>();
        registry
    }

    /// Registers `T` unless a type of the same name is already present.
    ///
    /// Returns `true` if the entry was added.
    pub fn register<T: ObjectType>(&mut self) -> bool {
        if self.types.contains_key(T::TYPE_NAME) {
            return false;
        }
        self.types.insert(T::TYPE_NAME, T::type_meta());
        true
    }

    /// Inserts `meta`, **overwriting** an entry of the same name.
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, meta: TypeMeta) -> Option<TypeMeta> {
        let old = self.types.insert(meta.name(), meta);
        if old.is_some() {
            log::debug!("type `{}` re-registered", meta.name());
        }
        old
    }

    /// Registers every type annotated with `#[object(auto_register)]`.
    ///
    /// Equivalent to calling [`register`](Self::register) for each of them;
    /// repeated calls do not insert duplicates.
    ///
    /// Returns `true` if automatic registration works on the current platform.
    /// Without the `auto_register` feature this does nothing and returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use knot_object::{TypeRegistry, derive::Object};
    ///
    /// #[derive(Object, Default)]
    /// #[object(auto_register)]
    /// struct Foo {
    ///     name: String,
    /// }
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.contains("Foo"));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            auto_register::__register_types(self);
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[cfg(feature = "auto_register")]
    #[inline]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&TypeMeta> {
        self.types.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over all entries, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TypeMeta> {
        self.types.values()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::builtin::FixedArray;
    use crate::registry::{Restore, TypeMeta};

    #[test]
    fn builtins() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.len(), 6);
        assert!(matches!(
            registry.get("DateTime").map(TypeMeta::restore),
            Some(Restore::Hydrate(_))
        ));
        assert!(matches!(
            registry.get("DatePeriod").map(TypeMeta::restore),
            Some(Restore::Unsupported)
        ));
        assert!(matches!(
            registry.get("FixedArray").map(TypeMeta::restore),
            Some(Restore::Sized(_))
        ));
        assert!(TypeRegistry::empty().is_empty());
    }

    #[test]
    fn insert_overwrites() {
        let mut registry = TypeRegistry::new();
        assert!(!registry.register::<FixedArray>());

        let old = registry.insert(TypeMeta::unsupported("FixedArray"));
        assert!(old.is_some());
        assert!(matches!(
            registry.get("FixedArray").map(TypeMeta::restore),
            Some(Restore::Unsupported)
        ));
    }
}
