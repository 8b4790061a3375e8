use knot_object::{Array, ObjectHeap, Value};

use super::{Account, Point, serializer};
use crate::{Error, JsonStrategy, NativeStrategy, StrategyError, Tree, XmlStrategy};

#[test]
fn json_layout() {
    let mut heap = ObjectHeap::new();
    let point = heap.insert(Point { x: 1, y: 2 });
    let mut root = Array::new();
    root.push(Value::Object(point));
    root.insert("again", Value::Object(point));
    root.insert("ratio", 0.5);

    let json = serializer(JsonStrategy::new())
        .serialize(&heap, &Value::Array(root))
        .unwrap();
    assert_eq!(
        json,
        concat!(
            r#"{"@map":"array","@value":{"#,
            r#""0":{"@type":"Point","x":{"@scalar":"integer","@value":1},"y":{"@scalar":"integer","@value":2}},"#,
            r#""again":{"@type":"@0"},"#,
            r#""ratio":{"@scalar":"float","@value":0.5}}}"#,
        )
    );
}

#[test]
fn hand_written_json() {
    let serializer = serializer(JsonStrategy::new());
    let mut heap = ObjectHeap::new();

    // Bare values, tagged scalars and plain maps mix freely.
    let input = r#"{
        "list": [1, {"@scalar": "float", "@value": "2.5"}],
        "p": {"@type": "Point", "x": 3, "y": {"@scalar": "integer", "@value": "4"}},
        "same": {"@type": "@0"}
    }"#;
    let Value::Array(root) = serializer.unserialize(&mut heap, input.into()).unwrap() else {
        panic!("expected an array");
    };

    let Some(Value::Array(list)) = root.get("list") else {
        panic!("expected a list");
    };
    assert_eq!(list.get(1), Some(&Value::Float(2.5)));

    let Some(Value::Object(p)) = root.get("p") else {
        panic!("expected an object");
    };
    assert_eq!(heap.get_as::<Point>(*p), Some(&Point { x: 3, y: 4 }));
    assert_eq!(root.get("same"), root.get("p"));
}

#[test]
fn native_tree_is_the_json_shape() {
    let mut heap = ObjectHeap::new();
    let point = heap.insert(Point { x: 0, y: 9 });

    let tree = serializer(NativeStrategy)
        .serialize(&heap, &Value::Object(point))
        .unwrap();
    assert_eq!(tree.get("@type"), Some(&Tree::Str("Point".into())));
    assert_eq!(
        tree.get("y").and_then(|y| y.get("@value")),
        Some(&Tree::Int(9))
    );
}

#[test]
fn xml_escaping_and_whitespace() {
    let mut heap = ObjectHeap::new();
    let mut root = Array::new();
    root.insert("a<b", "x & y");
    root.insert("quote", "\"'");
    root.insert("spaces", "  \n\t  ");
    root.insert("markup", "<scalar type=\"NULL\"/>");
    root.push(Value::from(""));
    let root = Value::Array(root);

    for strategy in [XmlStrategy::new(), XmlStrategy::new().with_indent(2)] {
        let serializer = serializer(strategy);
        let xml = serializer.serialize(&heap, &root).unwrap();
        assert!(xml.contains("key=\"a&lt;b\""));
        assert!(!xml.contains("<scalar type=\"NULL\"/>"));

        let back = serializer.unserialize(&mut heap, xml).unwrap();
        assert_eq!(back, root);
    }
}

#[test]
fn reserved_property_names() {
    let mut heap = ObjectHeap::new();
    let mut account = Account::default();
    account.extra.insert("@scalar", "string");
    let id = heap.insert(account);
    let value = Value::Object(id);

    let err = serializer(JsonStrategy::new())
        .serialize(&heap, &value)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Strategy(StrategyError::ReservedName { ref type_name, ref name })
            if type_name == "app.Account" && name == "@scalar"
    ));

    // Property names are attributes in XML, so any name is kept.
    let xml = serializer(XmlStrategy::new());
    let text = xml.serialize(&heap, &value).unwrap();
    let mut restored = ObjectHeap::new();
    let Value::Object(back) = xml.unserialize(&mut restored, text).unwrap() else {
        panic!("expected an object");
    };
    let account = restored.get_as::<Account>(back).unwrap();
    assert_eq!(account.extra.get("@scalar"), Some(&Value::from("string")));
}
