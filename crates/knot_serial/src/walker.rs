use knot_object::{Key, Object, ObjectHeap, ObjectId, ObjectKind, Value, ValueKind};
use knot_utils::hash::{HashMap, HashSet, new_map, new_set};

use crate::codec::{encode_container, encode_scalar};
use crate::config::{Budget, Limits};
use crate::error::SerializeError;
use crate::ir::Node;

// -----------------------------------------------------------------------------
// Encoder

/// Per-call state of serialization.
///
/// Objects are numbered in the order they are first met. Meeting one again
/// yields a [`Node::Reference`], which keeps the output finite for cycles and
/// shared for diamonds.
pub(crate) struct Encoder<'a> {
    heap: &'a ObjectHeap,
    visited: HashMap<ObjectId, usize>,
    budget: Budget,
}

impl<'a> Encoder<'a> {
    pub fn new(heap: &'a ObjectHeap, limits: Limits) -> Self {
        Self {
            heap,
            visited: new_map(),
            budget: Budget::new(limits),
        }
    }

    /// Number of distinct objects met so far.
    #[inline]
    pub fn objects(&self) -> usize {
        self.visited.len()
    }

    #[inline]
    pub fn nodes(&self) -> usize {
        self.budget.nodes()
    }

    pub fn encode(&mut self, value: &Value) -> Result<Node, SerializeError> {
        self.budget.node()?;

        if let Some(scalar) = encode_scalar(value) {
            return Ok(Node::Scalar(scalar));
        }

        match value {
            Value::Array(array) => {
                self.budget.enter()?;
                let node = encode_container(array, |v| self.encode(v))?;
                self.budget.leave();
                Ok(node)
            }
            Value::Object(id) => self.encode_object(*id),
            Value::Callable(callable) => Err(SerializeError::Unsupported {
                kind: ValueKind::Callable,
                name: callable.name().to_owned(),
            }),
            Value::Resource(resource) => Err(SerializeError::Unsupported {
                kind: ValueKind::Resource,
                name: resource.kind().to_owned(),
            }),
            scalar => Err(SerializeError::Unsupported {
                kind: scalar.kind(),
                name: scalar.kind().name().to_owned(),
            }),
        }
    }

    fn encode_object(&mut self, id: ObjectId) -> Result<Node, SerializeError> {
        if let Some(&index) = self.visited.get(&id) {
            log::trace!("object {id:?} already visited, back reference to {index}");
            return Ok(Node::Reference(index));
        }

        let heap = self.heap;
        let object = heap.get(id).ok_or(SerializeError::DanglingObject(id))?;

        let kind = object.kind();
        if kind == ObjectKind::Unsupported {
            return Err(SerializeError::Unsupported {
                kind: ValueKind::Object,
                name: object.type_name().to_owned(),
            });
        }

        // Registered before recursing, so cycles find it.
        let index = self.visited.len();
        self.visited.insert(id, index);

        self.budget.enter()?;
        let node = match kind {
            ObjectKind::FixedArray => self.encode_fixed(object)?,
            _ => self.encode_properties(object)?,
        };
        self.budget.leave();
        Ok(node)
    }

    fn encode_properties(&mut self, object: &dyn Object) -> Result<Node, SerializeError> {
        let collected = collect_properties(object);
        let mut properties = Vec::with_capacity(collected.len());
        for (name, value) in collected {
            properties.push((name.to_owned(), self.encode(&value)?));
        }
        Ok(Node::Object {
            type_name: object.type_name().to_owned(),
            properties,
        })
    }

    fn encode_fixed(&mut self, object: &dyn Object) -> Result<Node, SerializeError> {
        let type_name = object.type_name();
        let fixed = object
            .as_fixed()
            .ok_or(SerializeError::MissingCapability {
                type_name,
                capability: "FixedCollection",
            })?;

        let size = fixed.size();
        let mut entries = Vec::with_capacity(size);
        for index in 0..size {
            let value = fixed
                .element(index)
                .ok_or(SerializeError::MissingElement {
                    type_name,
                    index,
                    size,
                })?;
            entries.push((Key::Int(index as i64), self.encode(&value)?));
        }
        Ok(Node::Fixed {
            type_name: type_name.to_owned(),
            entries,
        })
    }
}

/// Reads the properties of every level, most-derived first.
///
/// A name already taken by a lower level is skipped on the levels above it.
/// Dynamic properties come last, unless a declared field took their name.
fn collect_properties(object: &dyn Object) -> Vec<(&str, Value)> {
    let mut seen: HashSet<&str> = new_set();
    let mut properties = Vec::new();

    let mut level = Some(object);
    while let Some(current) = level {
        for &name in current.field_names() {
            if seen.insert(name)
                && let Some(value) = current.field(name)
            {
                properties.push((name, value));
            }
        }
        level = current.parent();
    }

    if let Some(dynamic) = object.dynamic_fields() {
        for (name, value) in dynamic.iter() {
            if seen.insert(name) {
                properties.push((name, value.clone()));
            }
        }
    }

    properties
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use knot_object::derive::Object;
    use knot_object::{
        Array, Callable, FieldError, FixedCollection, FixedIndexError, Object, ObjectHeap,
        ObjectId, ObjectKind, Properties, Value, ValueKind,
    };

    use super::Encoder;
    use crate::config::Limits;
    use crate::error::{LimitError, SerializeError};
    use crate::ir::{Node, Scalar};

    #[derive(Object, Default)]
    struct Base {
        id: i64,
        tag: String,
    }

    #[derive(Object, Default)]
    struct Item {
        tag: String,
        next: Option<ObjectId>,
        #[object(parent)]
        base: Base,
        #[object(dynamic)]
        extra: Properties,
    }

    fn int(i: i64) -> Node {
        Node::Scalar(Scalar::Integer(i))
    }

    #[test]
    fn property_order_and_precedence() {
        let mut heap = ObjectHeap::new();
        let mut item = Item {
            tag: "derived".into(),
            ..Item::default()
        };
        item.base.id = 3;
        item.base.tag = "base".into();
        item.extra.insert("note", 1);
        item.extra.insert("tag", 2);
        let id = heap.insert(item);

        let node = Encoder::new(&heap, Limits::DEFAULT)
            .encode(&Value::Object(id))
            .unwrap();
        let Node::Object { properties, .. } = node else {
            panic!("expected an object");
        };
        let names: Vec<_> = properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["tag", "next", "id", "note"]);
        assert_eq!(properties[0].1, Node::Scalar(Scalar::String("derived".into())));
        assert_eq!(properties[3].1, int(1));
    }

    #[test]
    fn shared_objects_become_references() {
        let mut heap = ObjectHeap::new();
        let shared = heap.insert(Base::default());
        let array: Array = [Value::Object(shared), Value::Object(shared)].into_iter().collect();

        let mut encoder = Encoder::new(&heap, Limits::DEFAULT);
        let Node::Container(entries) = encoder.encode(&Value::Array(array)).unwrap() else {
            panic!("expected a container");
        };
        assert!(matches!(entries[0].1, Node::Object { .. }));
        assert_eq!(entries[1].1, Node::Reference(0));
        assert_eq!(encoder.objects(), 1);
    }

    #[test]
    fn self_cycle() {
        let mut heap = ObjectHeap::new();
        let id = heap.insert(Item::default());
        heap.get_as_mut::<Item>(id).unwrap().next = Some(id);

        let node = Encoder::new(&heap, Limits::DEFAULT)
            .encode(&Value::Object(id))
            .unwrap();
        let Node::Object { properties, .. } = node else {
            panic!("expected an object");
        };
        assert_eq!(properties[1], ("next".to_owned(), Node::Reference(0)));
    }

    #[test]
    fn unsupported_values_fail() {
        let heap = ObjectHeap::new();
        let callable = Callable::new("handler", |_| Value::Null);
        let mut array = Array::new();
        array.push(1);
        array.push(Value::Callable(callable));

        let err = Encoder::new(&heap, Limits::DEFAULT)
            .encode(&Value::Array(array))
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::Unsupported {
                kind: ValueKind::Callable,
                name: "handler".into(),
            }
        );
    }

    #[test]
    fn dangling_handle() {
        let mut heap = ObjectHeap::new();
        let id = heap.insert(Base::default());
        heap.remove(id);

        let err = Encoder::new(&heap, Limits::DEFAULT)
            .encode(&Value::Object(id))
            .unwrap_err();
        assert_eq!(err, SerializeError::DanglingObject(id));
    }

    struct Short;

    impl FixedCollection for Short {
        fn size(&self) -> usize {
            2
        }

        fn element(&self, index: usize) -> Option<Value> {
            (index == 0).then_some(Value::Int(1))
        }

        fn set_element(&mut self, index: usize, _: Value) -> Result<(), FixedIndexError> {
            Err(FixedIndexError { index, size: 2 })
        }
    }

    impl Object for Short {
        fn type_name(&self) -> &'static str {
            "Short"
        }

        fn kind(&self) -> ObjectKind {
            ObjectKind::FixedArray
        }

        fn field_names(&self) -> &'static [&'static str] {
            &[]
        }

        fn field(&self, _: &str) -> Option<Value> {
            None
        }

        fn set_field(&mut self, _: &str, value: Value) -> Result<(), FieldError> {
            Err(FieldError::NotFound(value))
        }

        fn as_fixed(&self) -> Option<&dyn FixedCollection> {
            Some(self)
        }
    }

    #[test]
    fn fixed_collection_shorter_than_its_size() {
        let mut heap = ObjectHeap::new();
        let id = heap.insert(Short);

        let err = Encoder::new(&heap, Limits::DEFAULT)
            .encode(&Value::Object(id))
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::MissingElement {
                type_name: "Short",
                index: 1,
                size: 2,
            }
        );
    }

    #[test]
    fn limits() {
        let mut nested = Value::Int(0);
        for _ in 0..10 {
            nested = Value::Array([nested].into_iter().collect());
        }
        let heap = ObjectHeap::new();

        let err = Encoder::new(&heap, Limits::DEFAULT.with_max_depth(4))
            .encode(&nested)
            .unwrap_err();
        assert_eq!(err, SerializeError::Limit(LimitError::Depth(4)));

        let err = Encoder::new(&heap, Limits::DEFAULT.with_max_nodes(5))
            .encode(&nested)
            .unwrap_err();
        assert_eq!(err, SerializeError::Limit(LimitError::Nodes(5)));
    }
}
