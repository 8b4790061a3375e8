use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how a `knot` crate is reachable
/// from the code a proc-macro expands into.
///
/// # Resolution rules
///
/// For a requested crate such as `knot_object`:
///
/// 1. listed in `dependencies` → `::knot_object`;
/// 2. the facade `knot` is listed in `dependencies` → `::knot::object`;
/// 3. steps 1 and 2 again for `dev-dependencies`;
/// 4. otherwise `::knot_object`.
///
/// A crate that expands its own derives should declare
/// `extern crate self as knot_object;` so rule 4 resolves inside it too.
///
/// # Example
///
/// ```rust
/// # use knot_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.crate_path("knot_object"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
}

const FACADE_NAME: &str = "knot";
const CRATE_PREFIX: &str = "knot_";

impl Manifest {
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be set by cargo");
        let mut path = PathBuf::from(dir);
        path.push("Cargo.toml");
        path
    }

    fn load(path: &PathBuf) -> Self {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("unable to read cargo manifest: {}", path.display()));
        let document = Document::parse(text.into_boxed_str())
            .unwrap_or_else(|_| panic!("failed to parse cargo manifest: {}", path.display()));
        Self { document }
    }

    fn parse_path(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::parse_path(&format!("::{FACADE_NAME}::{module}")));
        }
        None
    }

    /// Returns the path under which crate `name` is visible to the caller.
    pub fn crate_path(&self, name: &str) -> syn::Path {
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.document.get(section)
                && let Some(path) = Self::lookup(deps, name)
            {
                return path;
            }
        }
        Self::parse_path(&format!("::{name}"))
    }

    /// Runs `func` against the caller's manifest.
    ///
    /// Parsed manifests are cached per path for the lifetime of the compiler
    /// process.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: Mutex<BTreeMap<PathBuf, Manifest>> = Mutex::new(BTreeMap::new());

        let path = Self::manifest_path();
        let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        let manifest = cache.entry(path).or_insert_with_key(Self::load);
        func(manifest)
    }
}
