//! Scalars and arrays, the non-object part of the value model.

use knot_object::{Array, Key, Value};

use crate::ir::{Node, Scalar};

/// Encodes a scalar value, `None` for anything else.
pub(crate) fn encode_scalar(value: &Value) -> Option<Scalar> {
    Some(match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Boolean(*b),
        Value::Int(i) => Scalar::Integer(*i),
        Value::Float(f) => Scalar::Float(*f),
        Value::Str(s) => Scalar::String(s.clone()),
        _ => return None,
    })
}

pub(crate) fn decode_scalar(scalar: Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Boolean(b) => Value::Bool(b),
        Scalar::Integer(i) => Value::Int(i),
        Scalar::Float(f) => Value::Float(f),
        Scalar::String(s) => Value::Str(s),
    }
}

/// Encodes every entry of `array` in order, keeping its key.
pub(crate) fn encode_container<E>(
    array: &Array,
    mut encode: impl FnMut(&Value) -> Result<Node, E>,
) -> Result<Node, E> {
    let mut entries = Vec::with_capacity(array.len());
    for (key, value) in array {
        entries.push((key.clone(), encode(value)?));
    }
    Ok(Node::Container(entries))
}

/// Rebuilds an array in entry order. Keys spelling integers become integers.
pub(crate) fn decode_container<E>(
    entries: Vec<(Key, Node)>,
    mut decode: impl FnMut(Node) -> Result<Value, E>,
) -> Result<Array, E> {
    let mut array = Array::with_capacity(entries.len());
    for (key, node) in entries {
        array.insert(key, decode(node)?);
    }
    Ok(array)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use knot_object::{Array, Key, Value};

    use super::{decode_container, decode_scalar, encode_container, encode_scalar};
    use crate::ir::{Node, Scalar};

    #[test]
    fn scalars() {
        for value in [
            Value::Null,
            Value::Bool(false),
            Value::Int(-4),
            Value::Float(0.5),
            Value::from("text"),
        ] {
            let scalar = encode_scalar(&value).unwrap();
            assert_eq!(decode_scalar(scalar), value);
        }
        assert_eq!(encode_scalar(&Value::Array(Array::new())), None);
    }

    #[test]
    fn containers_keep_keys_and_order() {
        let mut array = Array::new();
        array.insert("b", 1);
        array.insert(5, 2);
        array.push("c");

        let node = encode_container::<Infallible>(&array, |v| {
            Ok(Node::Scalar(encode_scalar(v).unwrap()))
        })
        .unwrap();
        let Node::Container(entries) = &node else {
            panic!("expected a container");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, [Key::from("b"), Key::Int(5), Key::Int(6)]);

        let Node::Container(entries) = node else {
            unreachable!()
        };
        let back = decode_container::<Infallible>(entries, |n| match n {
            Node::Scalar(s) => Ok(decode_scalar(s)),
            _ => Ok(Value::Null),
        })
        .unwrap();
        assert_eq!(back, array);
    }

    #[test]
    fn numeric_string_keys_become_integers() {
        let entries = vec![(Key::Str("3".into()), Node::Scalar(Scalar::Null))];
        let array = decode_container::<Infallible>(entries, |_| Ok(Value::Null)).unwrap();
        assert_eq!(array.keys().next(), Some(&Key::Int(3)));
    }
}
