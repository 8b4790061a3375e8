//! Restorers for types that are not filled in field by field.

use knot_object::{HydrateError, Key, Object, Properties, Restore, Value};

use super::Decoder;
use crate::codec::decode_container;
use crate::error::UnserializeError;
use crate::ir::Node;

type Hydrate = fn(&Properties) -> Result<Box<dyn Object>, HydrateError>;

impl Decoder<'_> {
    /// Decodes the whole property map, then rebuilds the object from it.
    ///
    /// The visit index is reserved up front so the numbering of nested
    /// objects matches serialization. It only resolves once the object exists.
    pub(super) fn restore_temporal(
        &mut self,
        type_name: String,
        hydrate: Hydrate,
        properties: Vec<(String, Node)>,
    ) -> Result<Value, UnserializeError> {
        log::trace!("restoring `{type_name}` from its property map");

        let slot = self.mapping.len();
        self.mapping.push(None);

        let mut map = Properties::new();
        for (name, node) in properties {
            let value = self.decode(node)?;
            map.insert(name, value);
        }

        let object = hydrate(&map).map_err(|source| UnserializeError::Hydrate {
            type_name: type_name.clone(),
            source,
        })?;
        let id = self.allocate(object);
        self.mapping[slot] = Some(id);

        Ok(Value::Object(id))
    }

    /// Creates an instance sized to the entry count, then copies the decoded
    /// elements into it by position.
    pub(super) fn restore_fixed(
        &mut self,
        type_name: String,
        entries: Vec<(Key, Node)>,
    ) -> Result<Value, UnserializeError> {
        let Some(meta) = self.registry.get(&type_name) else {
            return Err(UnserializeError::UnknownType(type_name));
        };
        let sized = match meta.restore() {
            Restore::Sized(sized) => sized,
            Restore::Unsupported => return Err(UnserializeError::UnsupportedType(type_name)),
            Restore::Blank(_) | Restore::Hydrate(_) => {
                return Err(UnserializeError::KindMismatch {
                    type_name,
                    expected: "an object",
                    found: "a fixed container",
                });
            }
        };

        log::trace!("restoring `{type_name}` with {} elements", entries.len());

        let id = self.allocate(sized(entries.len()));
        self.mapping.push(Some(id));

        let elements = decode_container(entries, |n| self.decode(n))?;

        let object = self
            .heap
            .get_mut(id)
            .ok_or(UnserializeError::DanglingObject(id))?;
        let Some(fixed) = object.as_fixed_mut() else {
            return Err(UnserializeError::KindMismatch {
                type_name,
                expected: "a fixed container",
                found: "an object without element access",
            });
        };
        for (index, (_, value)) in elements.into_iter().enumerate() {
            fixed
                .set_element(index, value)
                .map_err(|source| UnserializeError::FixedIndex {
                    type_name: type_name.clone(),
                    source,
                })?;
        }

        Ok(Value::Object(id))
    }
}
