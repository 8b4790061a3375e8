use std::sync::Arc;

use knot_object::{
    Array, FieldError, Key, ObjectHeap, Resource, TypeRegistry, Value, ValueKind,
};

use super::{Link, Pair, Point, configured, serializer};
use crate::{
    Error, JsonSerializer, JsonStrategy, LimitError, Limits, NativeStrategy, Node, Scalar,
    SerializeError, Serializer, SerializerConfig, UnknownPropertyPolicy, UnserializeError,
};

fn int(i: i64) -> Node {
    Node::Scalar(Scalar::Integer(i))
}

fn point_node(properties: Vec<(&str, Node)>) -> Node {
    Node::Object {
        type_name: "Point".into(),
        properties: properties
            .into_iter()
            .map(|(name, node)| (name.to_owned(), node))
            .collect(),
    }
}

#[test]
fn unknown_type() {
    let serializer = Serializer::with_registry(NativeStrategy, Arc::new(TypeRegistry::new()));
    let mut heap = ObjectHeap::new();
    let err = serializer
        .from_ir(&mut heap, point_node(vec![("x", int(1))]))
        .unwrap_err();
    assert_eq!(err, UnserializeError::UnknownType("Point".into()));
}

#[test]
fn malformed_references() {
    let serializer = serializer(NativeStrategy);
    let mut heap = ObjectHeap::new();

    assert_eq!(
        serializer.from_ir(&mut heap, Node::Reference(3)),
        Err(UnserializeError::MalformedReference { index: 3 })
    );

    // A forward reference to an object not restored yet.
    let node = Node::Container(vec![
        (Key::Int(0), Node::Reference(1)),
        (Key::Int(1), point_node(vec![])),
    ]);
    assert_eq!(
        serializer.from_ir(&mut heap, node),
        Err(UnserializeError::MalformedReference { index: 1 })
    );

    let json = serializer_json();
    let err = json
        .unserialize(&mut heap, r#"{"@type":"@x"}"#.into())
        .unwrap_err();
    assert!(matches!(err, Error::Strategy(_)));
    assert!(heap.is_empty());
}

fn serializer_json() -> JsonSerializer {
    serializer(JsonStrategy::new())
}

#[test]
fn kind_mismatch() {
    let serializer = serializer(NativeStrategy);
    let mut heap = ObjectHeap::new();

    let err = serializer
        .from_ir(
            &mut heap,
            Node::Object {
                type_name: "FixedArray".into(),
                properties: Vec::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, UnserializeError::KindMismatch { ref type_name, .. } if type_name == "FixedArray"));

    let err = serializer
        .from_ir(
            &mut heap,
            Node::Fixed {
                type_name: "Point".into(),
                entries: Vec::new(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, UnserializeError::KindMismatch { ref type_name, .. } if type_name == "Point"));
}

#[test]
fn field_conversion_error() {
    let serializer = serializer(NativeStrategy);
    let mut heap = ObjectHeap::new();

    let node = point_node(vec![("x", Node::Scalar(Scalar::String("left".into())))]);
    let err = serializer.from_ir(&mut heap, node).unwrap_err();
    let UnserializeError::Field {
        type_name,
        name,
        source,
    } = err
    else {
        panic!("expected a field error, found {err:?}");
    };
    assert_eq!(type_name, "Point");
    assert_eq!(name, "x");
    assert!(matches!(source, FieldError::Convert { field: "x", .. }));
}

#[test]
fn unknown_property_policy() {
    let node = || point_node(vec![("x", int(1)), ("z", int(2))]);
    let mut heap = ObjectHeap::new();

    let Ok(Value::Object(id)) = serializer(NativeStrategy).from_ir(&mut heap, node()) else {
        panic!("unknown properties are discarded by default");
    };
    assert_eq!(heap.get_as::<Point>(id), Some(&Point { x: 1, y: 0 }));

    let strict = configured(
        NativeStrategy,
        SerializerConfig::new().with_unknown_property(UnknownPropertyPolicy::Reject),
    );
    let before = heap.len();
    assert_eq!(
        strict.from_ir(&mut heap, node()),
        Err(UnserializeError::UnknownProperty {
            type_name: "Point".into(),
            name: "z".into(),
        })
    );
    assert_eq!(heap.len(), before);
}

#[test]
fn failed_calls_leave_the_heap_unchanged() {
    let mut heap = ObjectHeap::new();
    let kept = heap.insert(Point { x: 7, y: 7 });

    // Two objects are restored before the unknown type is met.
    let node = Node::Object {
        type_name: "Pair".into(),
        properties: vec![
            ("left".into(), point_node(vec![("x", int(1))])),
            (
                "right".into(),
                Node::Object {
                    type_name: "Missing".into(),
                    properties: Vec::new(),
                },
            ),
        ],
    };
    let err = serializer(NativeStrategy)
        .from_ir(&mut heap, node)
        .unwrap_err();
    assert_eq!(err, UnserializeError::UnknownType("Missing".into()));

    assert_eq!(heap.len(), 1);
    assert_eq!(heap.get_as::<Point>(kept), Some(&Point { x: 7, y: 7 }));
}

#[test]
fn unsupported_values() {
    let mut heap = ObjectHeap::new();
    let link = heap.insert(Link {
        label: "with resource".into(),
        next: None,
    });
    let mut array = Array::new();
    array.push(Value::Object(link));
    array.push(Value::Resource(Resource::new("stream", 3)));

    let err = serializer(JsonStrategy::new())
        .serialize(&heap, &Value::Array(array))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Serialize(SerializeError::Unsupported { kind: ValueKind::Resource, ref name })
            if name == "stream"
    ));
}

#[test]
fn dangling_objects() {
    let mut heap = ObjectHeap::new();
    let gone = heap.insert(Point::default());
    heap.remove(gone);
    let pair = heap.insert(Pair {
        left: Some(gone),
        right: None,
    });

    let err = serializer(NativeStrategy)
        .to_ir(&heap, &Value::Object(pair))
        .unwrap_err();
    assert_eq!(err, SerializeError::DanglingObject(gone));
}

#[test]
fn limits_abort_the_call() {
    let mut heap = ObjectHeap::new();
    let mut previous = heap.insert(Link::default());
    for _ in 0..20 {
        previous = heap.insert(Link {
            label: String::new(),
            next: Some(previous),
        });
    }
    let head = Value::Object(previous);

    let shallow = configured(
        NativeStrategy,
        SerializerConfig::new().with_limits(Limits::DEFAULT.with_max_depth(8)),
    );
    assert_eq!(
        shallow.to_ir(&heap, &head),
        Err(SerializeError::Limit(LimitError::Depth(8)))
    );

    let node = serializer(NativeStrategy).to_ir(&heap, &head).unwrap();
    let before = heap.len();
    assert_eq!(
        shallow.from_ir(&mut heap, node.clone()),
        Err(UnserializeError::Limit(LimitError::Depth(8)))
    );

    let small = configured(
        NativeStrategy,
        SerializerConfig::new().with_limits(Limits::DEFAULT.with_max_nodes(10)),
    );
    assert_eq!(
        small.from_ir(&mut heap, node),
        Err(UnserializeError::Limit(LimitError::Nodes(10)))
    );
    assert_eq!(heap.len(), before);
}
