//! Parsing of `#[object(...)]` attributes.

use proc_macro2::Span;
use syn::{Attribute, LitStr, Path};

use crate::OBJECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Type attributes

/// `#[object(...)]` on the struct itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `name = "..."`: the registered type name, defaults to the ident.
    pub name: Option<LitStr>,
    /// `wakeup = path`: a `fn(&mut Self)` run after restoration.
    pub wakeup: Option<Path>,
    /// `blank = path`: a `fn() -> Self` used instead of `Default`.
    pub blank: Option<Path>,
    /// `auto_register`: submit the type for `TypeRegistry::auto_register`.
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(OBJECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    set_once(&mut this.name, meta.value()?.parse()?, &meta.path)
                } else if meta.path.is_ident("wakeup") {
                    set_once(&mut this.wakeup, meta.value()?.parse()?, &meta.path)
                } else if meta.path.is_ident("blank") {
                    set_once(&mut this.blank, meta.value()?.parse()?, &meta.path)
                } else if meta.path.is_ident("auto_register") {
                    set_once(&mut this.auto_register, Span::call_site(), &meta.path)
                } else {
                    Err(meta.error("expected `name`, `wakeup`, `blank` or `auto_register`"))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// What a struct field stands for.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldRole {
    /// A declared property.
    #[default]
    Property,
    /// The next level of the hierarchy.
    Parent,
    /// The dynamic-property store.
    Dynamic,
    /// Not serialized.
    Skip,
}

/// `#[object(...)]` on a field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub role: FieldRole,
    /// `rename = "..."`: the property name, defaults to the ident.
    pub rename: Option<LitStr>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(OBJECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let role = if meta.path.is_ident("parent") {
                    FieldRole::Parent
                } else if meta.path.is_ident("dynamic") {
                    FieldRole::Dynamic
                } else if meta.path.is_ident("skip") {
                    FieldRole::Skip
                } else if meta.path.is_ident("rename") {
                    return set_once(&mut this.rename, meta.value()?.parse()?, &meta.path);
                } else {
                    return Err(meta.error("expected `parent`, `dynamic`, `skip` or `rename`"));
                };
                if this.role != FieldRole::Property {
                    return Err(meta.error("a field can have only one of `parent`, `dynamic` and `skip`"));
                }
                this.role = role;
                Ok(())
            })?;
        }
        if this.rename.is_some() && this.role != FieldRole::Property {
            return Err(syn::Error::new(
                Span::call_site(),
                "`rename` applies only to property fields",
            ));
        }
        Ok(this)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, path: &Path) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(path, "duplicate attribute"));
    }
    *slot = Some(value);
    Ok(())
}
