use knot_object::{FieldError, Object, ObjectHeap, ObjectId, Restore, TypeRegistry, Value};

use crate::codec::{decode_container, decode_scalar};
use crate::config::{Budget, SerializerConfig, UnknownPropertyPolicy};
use crate::error::UnserializeError;
use crate::ir::Node;

// -----------------------------------------------------------------------------
// Modules

mod restore;

// -----------------------------------------------------------------------------
// Decoder

/// Per-call state of unserialization.
///
/// `mapping` holds the rebuilt object of every visit index, in the order the
/// objects were first met. A slot is `None` while a hydrated object is still
/// being collected.
pub(crate) struct Decoder<'a> {
    heap: &'a mut ObjectHeap,
    registry: &'a TypeRegistry,
    unknown_property: UnknownPropertyPolicy,
    mapping: Vec<Option<ObjectId>>,
    allocated: Vec<ObjectId>,
    budget: Budget,
}

impl<'a> Decoder<'a> {
    pub fn new(
        heap: &'a mut ObjectHeap,
        registry: &'a TypeRegistry,
        config: &SerializerConfig,
    ) -> Self {
        Self {
            heap,
            registry,
            unknown_property: config.unknown_property,
            mapping: Vec::new(),
            allocated: Vec::new(),
            budget: Budget::new(config.limits),
        }
    }

    #[inline]
    pub fn objects(&self) -> usize {
        self.allocated.len()
    }

    #[inline]
    pub fn nodes(&self) -> usize {
        self.budget.nodes()
    }

    /// Decodes `node`; on failure every object allocated so far is removed.
    pub fn run(&mut self, node: Node) -> Result<Value, UnserializeError> {
        let result = self.decode(node);
        if result.is_err() {
            self.rollback();
        }
        result
    }

    fn rollback(&mut self) {
        log::debug!("rolling back {} restored objects", self.allocated.len());
        for id in self.allocated.drain(..) {
            self.heap.remove(id);
        }
        self.mapping.clear();
    }

    pub fn decode(&mut self, node: Node) -> Result<Value, UnserializeError> {
        self.budget.node()?;

        match node {
            Node::Scalar(scalar) => Ok(decode_scalar(scalar)),
            Node::Container(entries) => {
                self.budget.enter()?;
                let array = decode_container(entries, |n| self.decode(n))?;
                self.budget.leave();
                Ok(Value::Array(array))
            }
            Node::Reference(index) => match self.mapping.get(index) {
                Some(Some(id)) => {
                    log::trace!("back reference {index} resolved to {id:?}");
                    Ok(Value::Object(*id))
                }
                _ => Err(UnserializeError::MalformedReference { index }),
            },
            Node::Object {
                type_name,
                properties,
            } => {
                self.budget.enter()?;
                let value = self.decode_object(type_name, properties)?;
                self.budget.leave();
                Ok(value)
            }
            Node::Fixed { type_name, entries } => {
                self.budget.enter()?;
                let value = self.restore_fixed(type_name, entries)?;
                self.budget.leave();
                Ok(value)
            }
        }
    }

    fn decode_object(
        &mut self,
        type_name: String,
        properties: Vec<(String, Node)>,
    ) -> Result<Value, UnserializeError> {
        let Some(meta) = self.registry.get(&type_name) else {
            return Err(UnserializeError::UnknownType(type_name));
        };

        match meta.restore() {
            Restore::Blank(blank) => self.restore_plain(type_name, blank, properties),
            Restore::Hydrate(hydrate) => self.restore_temporal(type_name, hydrate, properties),
            Restore::Sized(_) => Err(UnserializeError::KindMismatch {
                type_name,
                expected: "a fixed container",
                found: "an object",
            }),
            Restore::Unsupported => Err(UnserializeError::UnsupportedType(type_name)),
        }
    }

    /// Creates the blank instance, makes it reachable by back references,
    /// then assigns the decoded properties.
    fn restore_plain(
        &mut self,
        type_name: String,
        blank: fn() -> Box<dyn Object>,
        properties: Vec<(String, Node)>,
    ) -> Result<Value, UnserializeError> {
        let id = self.allocate(blank());
        self.mapping.push(Some(id));

        let mut values = Vec::with_capacity(properties.len());
        for (name, node) in properties {
            values.push((name, self.decode(node)?));
        }

        let policy = self.unknown_property;
        let object = self
            .heap
            .get_mut(id)
            .ok_or(UnserializeError::DanglingObject(id))?;
        for (name, value) in values {
            assign(object, &type_name, name, value, policy)?;
        }
        object.wakeup();

        Ok(Value::Object(id))
    }

    fn allocate(&mut self, object: Box<dyn Object>) -> ObjectId {
        let id = self.heap.insert_boxed(object);
        self.allocated.push(id);
        id
    }
}

/// Sets one property: a declared field of any level, else the dynamic
/// store, else the unknown-property policy decides.
fn assign(
    object: &mut dyn Object,
    type_name: &str,
    name: String,
    value: Value,
    policy: UnknownPropertyPolicy,
) -> Result<(), UnserializeError> {
    let value = match object.set_field(&name, value) {
        Ok(()) => return Ok(()),
        Err(FieldError::NotFound(value)) => value,
        Err(source) => {
            return Err(UnserializeError::Field {
                type_name: type_name.to_owned(),
                name,
                source,
            });
        }
    };

    if let Some(dynamic) = object.dynamic_fields_mut() {
        dynamic.insert(name, value);
        return Ok(());
    }

    match policy {
        UnknownPropertyPolicy::Discard => {
            log::warn!("discarding unknown property `{name}` of `{type_name}`");
            Ok(())
        }
        UnknownPropertyPolicy::Reject => Err(UnserializeError::UnknownProperty {
            type_name: type_name.to_owned(),
            name,
        }),
    }
}
