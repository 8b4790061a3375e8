//! See [`Object`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static OBJECT_ATTRIBUTE_NAME: &str = "object";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod derive_object;

// -----------------------------------------------------------------------------
// Crate Path

/// Path under which the caller sees `knot_object`.
///
/// 1. A crate depending on `knot_object` gets `::knot_object`.
/// 2. A crate depending on the facade `knot` gets `::knot::object`.
/// 3. Otherwise `::knot_object`, which is also what `knot_object` uses for
///    itself through `extern crate self as knot_object`.
fn knot_object_path() -> syn::Path {
    knot_macro_utils::Manifest::shared(|manifest| manifest.crate_path("knot_object"))
}

// -----------------------------------------------------------------------------
// Macros

/// Implements `Object` and `ObjectType` for a struct with named fields.
///
/// Every field is a declared property unless marked otherwise. Field types
/// must implement `ToValue` and `FromValue`.
///
/// ## Type attributes
///
/// - `#[object(name = "Name")]`: the registered type name. Defaults to the
///   struct ident.
/// - `#[object(blank = path)]`: `fn() -> Self` creating the blank instance
///   that restoration fills in. Defaults to `Default::default`.
/// - `#[object(wakeup = path)]`: `fn(&mut Self)` run once all properties of
///   a restored object are set. Without it, the hook of the parent level runs.
/// - `#[object(auto_register)]`: include the type in
///   `TypeRegistry::auto_register`. Ignored for generic types, and a no-op
///   without the `auto_register` feature.
///
/// ## Field attributes
///
/// - `#[object(parent)]`: the field is the next level of the hierarchy. Its
///   type must implement `Object`.
/// - `#[object(dynamic)]`: the field is a `Properties` store holding the
///   properties no level declares.
/// - `#[object(skip)]`: the field is neither serialized nor restored.
/// - `#[object(rename = "name")]`: the property name of the field.
///
/// ## Example
///
/// ```rust, ignore
/// #[derive(Object, Default)]
/// #[object(name = "app.User", wakeup = User::reconnect)]
/// struct User {
///     #[object(rename = "userName")]
///     name: String,
///     #[object(parent)]
///     entity: Entity,
///     #[object(dynamic)]
///     extra: Properties,
///     #[object(skip)]
///     session: Option<Session>,
/// }
/// ```
#[proc_macro_derive(Object, attributes(object))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_object::ObjectStruct::parse(&input) {
        Ok(object) => object.expand().into(),
        Err(err) => err.into_compile_error().into(),
    }
}
