use chrono::{NaiveDate, TimeZone as _, Utc};

use knot_object::{
    Array, DateInterval, DatePeriod, DateTime, DateTimeImmutable, DateTimeZone, FixedArray, Key,
    ObjectHeap, Value, ValueKind, Zone,
};

use super::{Point, serializer};
use crate::{
    Error, JsonStrategy, NativeStrategy, Node, Scalar, SerializeError, UnserializeError,
    XmlStrategy,
};

fn paris_summer() -> DateTime {
    let local = NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_micro_opt(12, 30, 15, 500)
        .unwrap();
    DateTime::from_local(local, Zone::parse(3, "Europe/Paris").unwrap()).unwrap()
}

#[test]
fn date_times_keep_instant_and_zone() {
    let mut heap = ObjectHeap::new();
    let dt = paris_summer();
    let fixed = DateTimeImmutable::new(dt.instant(), Zone::parse(1, "-03:30").unwrap());
    let a = heap.insert(dt);
    let b = heap.insert(fixed);
    let c = heap.insert(DateTimeZone::new(Zone::UTC));
    let root: Array = [Value::Object(a), Value::Object(b), Value::Object(c), Value::Object(a)]
        .into_iter()
        .collect();

    let serializer = serializer(JsonStrategy::new());
    let json = serializer.serialize(&heap, &Value::Array(root)).unwrap();
    assert!(json.contains(r#""date":{"@scalar":"string","@value":"2024-07-01 12:30:15.000500"}"#));

    let mut restored = ObjectHeap::new();
    let Value::Array(back) = serializer.unserialize(&mut restored, json).unwrap() else {
        panic!("expected an array");
    };
    let ids: Vec<_> = back
        .values()
        .map(|v| match v {
            Value::Object(id) => *id,
            other => panic!("expected an object, found {other:?}"),
        })
        .collect();

    assert_eq!(restored.get_as::<DateTime>(ids[0]), Some(&dt));
    assert_eq!(restored.get_as::<DateTimeImmutable>(ids[1]), Some(&fixed));
    assert_eq!(restored.get_as::<DateTimeZone>(ids[2]).map(|z| z.zone()), Some(Zone::UTC));
    // A repeated date/time is the same restored instance.
    assert_eq!(ids[3], ids[0]);
    assert_eq!(restored.len(), 3);
}

#[test]
fn interval_round_trip() {
    let mut interval = DateInterval::new(1, 0, 2, 3, 4, 5);
    interval.fraction = 0.125;
    interval.invert = true;
    interval.total_days = Some(397);

    let mut heap = ObjectHeap::new();
    let id = heap.insert(interval);

    let serializer = serializer(XmlStrategy::new());
    let xml = serializer.serialize(&heap, &Value::Object(id)).unwrap();
    let mut restored = ObjectHeap::new();
    let Value::Object(back) = serializer.unserialize(&mut restored, xml).unwrap() else {
        panic!("expected an object");
    };
    assert_eq!(restored.get_as::<DateInterval>(back), Some(&interval));
}

#[test]
fn repeated_wall_time_restores_its_first_occurrence() {
    // 02:30 happens twice in Paris on that night.
    let first = Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 10, 27, 1, 30, 0).unwrap();
    let paris = Zone::parse(3, "Europe/Paris").unwrap();

    let mut heap = ObjectHeap::new();
    let root: Array = [first, second]
        .into_iter()
        .map(|instant| Value::Object(heap.insert(DateTime::new(instant, paris))))
        .collect();

    let serializer = serializer(JsonStrategy::new());
    let json = serializer.serialize(&heap, &Value::Array(root)).unwrap();
    let mut restored = ObjectHeap::new();
    let Value::Array(back) = serializer.unserialize(&mut restored, json).unwrap() else {
        panic!("expected an array");
    };
    let instants: Vec<_> = back
        .values()
        .map(|v| {
            let id = v.as_object().unwrap();
            restored.get_as::<DateTime>(id).unwrap().instant()
        })
        .collect();
    assert_eq!(instants, [first, first]);
}

#[test]
fn negative_interval_components() {
    let mut interval = DateInterval::new(0, 0, -1, 0, 0, 0);
    interval.fraction = -0.5;

    let mut heap = ObjectHeap::new();
    let id = heap.insert(interval);

    let serializer = serializer(NativeStrategy);
    let tree = serializer.serialize(&heap, &Value::Object(id)).unwrap();
    let mut restored = ObjectHeap::new();
    let Value::Object(back) = serializer.unserialize(&mut restored, tree).unwrap() else {
        panic!("expected an object");
    };
    assert_eq!(restored.get_as::<DateInterval>(back), Some(&interval));
}

#[test]
fn invalid_temporal_input_fails() {
    let serializer = serializer(NativeStrategy);
    let mut heap = ObjectHeap::new();

    let node = Node::Object {
        type_name: "DateTime".into(),
        properties: vec![
            ("date".into(), Node::Scalar(Scalar::String("2024-13-01 00:00:00".into()))),
            ("timezone_type".into(), Node::Scalar(Scalar::Integer(3))),
            ("timezone".into(), Node::Scalar(Scalar::String("UTC".into()))),
        ],
    };
    let err = serializer.from_ir(&mut heap, node).unwrap_err();
    assert!(matches!(err, UnserializeError::Hydrate { ref type_name, .. } if type_name == "DateTime"));

    let node = Node::Object {
        type_name: "DateInterval".into(),
        properties: vec![("y".into(), Node::Scalar(Scalar::String("soon".into())))],
    };
    assert!(matches!(
        serializer.from_ir(&mut heap, node),
        Err(UnserializeError::Hydrate { .. })
    ));
    assert!(heap.is_empty());
}

#[test]
fn date_period_is_unsupported() {
    let mut heap = ObjectHeap::new();
    let period = DatePeriod::open(paris_summer(), DateInterval::new(0, 0, 1, 0, 0, 0));
    let id = heap.insert(period);

    let err = serializer(JsonStrategy::new())
        .serialize(&heap, &Value::Object(id))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Serialize(SerializeError::Unsupported { kind: ValueKind::Object, ref name })
            if name == "DatePeriod"
    ));

    let node = Node::Object {
        type_name: "DatePeriod".into(),
        properties: Vec::new(),
    };
    assert_eq!(
        serializer(NativeStrategy).from_ir(&mut heap, node),
        Err(UnserializeError::UnsupportedType("DatePeriod".into()))
    );
}

#[test]
fn fixed_arrays() {
    let mut heap = ObjectHeap::new();
    let point = heap.insert(Point { x: 1, y: 1 });
    let fixed = heap.insert(FixedArray::from(vec![
        Value::Int(1),
        Value::from("two"),
        Value::Object(point),
        Value::Null,
    ]));
    let root: Array = [Value::Object(fixed), Value::Object(point)].into_iter().collect();

    let node = serializer(NativeStrategy)
        .to_ir(&heap, &Value::Array(root.clone()))
        .unwrap();
    let Node::Container(entries) = &node else {
        panic!("expected a container");
    };
    let Node::Fixed { type_name, entries: elements } = &entries[0].1 else {
        panic!("expected a fixed container");
    };
    assert_eq!(type_name, "FixedArray");
    assert_eq!(elements.len(), 4);
    // The fixed array is object 0, the point inside it object 1.
    assert_eq!(entries[1].1, Node::Reference(1));

    let json_serializer = serializer(JsonStrategy::new());
    let json = json_serializer.serialize(&heap, &Value::Array(root.clone())).unwrap();
    assert!(json.contains(r#""@parent":"FixedArray""#));

    let mut restored = ObjectHeap::new();
    let Value::Array(back) = json_serializer.unserialize(&mut restored, json).unwrap() else {
        panic!("expected an array");
    };
    let Some(Value::Object(first)) = back.get(0) else {
        panic!("expected an object");
    };
    let elements = restored.get_as::<FixedArray>(*first).unwrap();
    assert_eq!(elements.size(), 4);
    assert_eq!(elements.get(1), Some(&Value::from("two")));
    assert_eq!(elements.get(2), back.get(1));

    let xml_serializer = serializer(XmlStrategy::new());
    let xml = xml_serializer.serialize(&heap, &Value::Object(fixed)).unwrap();
    assert!(xml.contains(r#"<fixed type="FixedArray" parent="FixedArray">"#));
    let mut restored = ObjectHeap::new();
    let Value::Object(back) = xml_serializer.unserialize(&mut restored, xml).unwrap() else {
        panic!("expected an object");
    };
    assert_eq!(restored.get_as::<FixedArray>(back).map(FixedArray::size), Some(4));
}

#[test]
fn fixed_container_from_ir() {
    let node = Node::Fixed {
        type_name: "FixedArray".into(),
        entries: vec![
            (Key::Int(0), Node::Scalar(Scalar::Boolean(true))),
            (Key::Int(1), Node::Scalar(Scalar::Integer(2))),
        ],
    };
    let mut heap = ObjectHeap::new();
    let Ok(Value::Object(id)) = serializer(NativeStrategy).from_ir(&mut heap, node) else {
        panic!("expected an object");
    };
    let fixed = heap.get_as::<FixedArray>(id).unwrap();
    assert_eq!(fixed.as_slice(), [Value::Bool(true), Value::Int(2)]);
}
