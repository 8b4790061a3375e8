//! The native nested-tree wire form.
//!
//! | node | tree |
//! |---|---|
//! | scalar | `{"@scalar": "<tag>", "@value": raw}` |
//! | container | `{"@map": "array", "@value": {key: node, ...}}` |
//! | object | `{"@type": "<TypeName>", "<prop>": node, ...}` |
//! | back reference | `{"@type": "@<index>"}` |
//! | fixed container | `{"@type": "<TypeName>", "@parent": "FixedArray", "@value": {...}}` |

use std::fmt::{self, Formatter};

use serde_core::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_core::ser::SerializeMap;
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use knot_object::Key;
use knot_utils::hash::{HashMap, map_with_capacity};

use crate::error::StrategyError;
use crate::ir::{FIXED_PARENT, Node, Scalar, ScalarKind};

pub const TYPE_KEY: &str = "@type";
pub const SCALAR_KEY: &str = "@scalar";
pub const VALUE_KEY: &str = "@value";
pub const MAP_KEY: &str = "@map";
pub const PARENT_KEY: &str = "@parent";

/// Marker stored under [`MAP_KEY`].
const MAP_MARKER: &str = "array";

const RESERVED: [&str; 5] = [TYPE_KEY, SCALAR_KEY, VALUE_KEY, MAP_KEY, PARENT_KEY];

// -----------------------------------------------------------------------------
// Tree

/// An ordered tree of scalars and maps.
///
/// Deserializing accepts sequences as maps keyed `0..n`, and normalizes map
/// keys that spell canonical integers. A repeated key keeps its first
/// position and its last value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(Vec<(Key, Tree)>),
}

impl Tree {
    /// Looks up a string key of a map.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map()?
            .iter()
            .find_map(|(k, v)| (k.as_str() == Some(key)).then_some(v))
    }

    #[inline]
    pub fn as_map(&self) -> Option<&[(Key, Tree)]> {
        match self {
            Tree::Map(entries) => Some(entries),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    fn str(value: &str) -> Tree {
        Tree::Str(value.to_owned())
    }

    fn reserved(key: &str, value: Tree) -> (Key, Tree) {
        (Key::Str(key.to_owned()), value)
    }
}

// -----------------------------------------------------------------------------
// Node -> Tree

impl Tree {
    /// Lays out `node` in the native wire form.
    ///
    /// Fails when an object property is named like a reserved key, since it
    /// would be read back as part of the layout.
    pub fn from_node(node: &Node) -> Result<Tree, StrategyError> {
        Ok(match node {
            Node::Scalar(scalar) => {
                let raw = match scalar {
                    Scalar::Null => Tree::Null,
                    Scalar::Boolean(b) => Tree::Bool(*b),
                    Scalar::Integer(i) => Tree::Int(*i),
                    Scalar::Float(f) => Tree::Float(*f),
                    Scalar::String(s) => Tree::Str(s.clone()),
                };
                Tree::Map(vec![
                    Tree::reserved(SCALAR_KEY, Tree::str(scalar.kind().tag())),
                    Tree::reserved(VALUE_KEY, raw),
                ])
            }
            Node::Container(entries) => Tree::Map(vec![
                Tree::reserved(MAP_KEY, Tree::str(MAP_MARKER)),
                Tree::reserved(VALUE_KEY, Tree::from_entries(entries)?),
            ]),
            Node::Object {
                type_name,
                properties,
            } => {
                let mut map = Vec::with_capacity(properties.len() + 1);
                map.push(Tree::reserved(TYPE_KEY, Tree::str(type_name)));
                for (name, value) in properties {
                    if RESERVED.contains(&name.as_str()) {
                        return Err(StrategyError::ReservedName {
                            type_name: type_name.clone(),
                            name: name.clone(),
                        });
                    }
                    map.push((Key::from(name.as_str()), Tree::from_node(value)?));
                }
                Tree::Map(map)
            }
            Node::Reference(index) => Tree::Map(vec![Tree::reserved(
                TYPE_KEY,
                Tree::Str(format!("@{index}")),
            )]),
            Node::Fixed { type_name, entries } => Tree::Map(vec![
                Tree::reserved(TYPE_KEY, Tree::str(type_name)),
                Tree::reserved(PARENT_KEY, Tree::str(FIXED_PARENT)),
                Tree::reserved(VALUE_KEY, Tree::from_entries(entries)?),
            ]),
        })
    }

    fn from_entries(entries: &[(Key, Node)]) -> Result<Tree, StrategyError> {
        entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), Tree::from_node(value)?)))
            .collect::<Result<Vec<_>, StrategyError>>()
            .map(Tree::Map)
    }
}

// -----------------------------------------------------------------------------
// Tree -> Node

impl Tree {
    /// Reads a node back from the native wire form.
    pub fn into_node(self) -> Result<Node, StrategyError> {
        let entries = match self {
            Tree::Null => return Ok(Node::Scalar(Scalar::Null)),
            Tree::Bool(b) => return Ok(Node::Scalar(Scalar::Boolean(b))),
            Tree::Int(i) => return Ok(Node::Scalar(Scalar::Integer(i))),
            Tree::Float(f) => return Ok(Node::Scalar(Scalar::Float(f))),
            Tree::Str(s) => return Ok(Node::Scalar(Scalar::String(s))),
            Tree::Map(entries) => entries,
        };

        let mut reserved = Reserved::default();
        let mut rest = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match key.as_str().and_then(|k| RESERVED.iter().position(|r| *r == k)) {
                Some(slot) => reserved.slots[slot] = Some(value),
                None => rest.push((key, value)),
            }
        }
        let [type_name, scalar, value, map, parent] = reserved.slots;

        if map.is_some() && type_name.is_none() {
            return Ok(Node::Container(decode_entries(value)?));
        }

        if let Some(tag) = scalar {
            let Tree::Str(tag) = tag else {
                return Err(StrategyError::malformed("`@scalar` must be a string tag"));
            };
            return Ok(Node::Scalar(coerce(&tag, value.unwrap_or(Tree::Null))?));
        }

        if let Some(Tree::Str(parent)) = &parent
            && parent == FIXED_PARENT
        {
            let Some(Tree::Str(type_name)) = type_name else {
                return Err(StrategyError::malformed("fixed container without `@type`"));
            };
            return Ok(Node::Fixed {
                type_name,
                entries: decode_entries(value)?,
            });
        }

        match type_name {
            Some(Tree::Str(name)) => match name.strip_prefix('@') {
                Some(index) => index
                    .parse()
                    .map(Node::Reference)
                    .map_err(|_| StrategyError::Malformed(format!("invalid back reference `{name}`"))),
                None => {
                    let properties = rest
                        .into_iter()
                        .map(|(key, value)| Ok((key.to_string(), value.into_node()?)))
                        .collect::<Result<_, StrategyError>>()?;
                    Ok(Node::Object {
                        type_name: name,
                        properties,
                    })
                }
            },
            Some(_) => Err(StrategyError::malformed("`@type` must be a string")),
            None => {
                // A plain map: reserved keys other than `@type` are data here.
                let mut entries = Vec::with_capacity(rest.len() + 2);
                for (slot, tree) in [(VALUE_KEY, value), (PARENT_KEY, parent)] {
                    if let Some(tree) = tree {
                        entries.push((Key::Str(slot.to_owned()), tree.into_node()?));
                    }
                }
                for (key, tree) in rest {
                    entries.push((key, tree.into_node()?));
                }
                Ok(Node::Container(entries))
            }
        }
    }
}

#[derive(Default)]
struct Reserved {
    slots: [Option<Tree>; 5],
}

fn decode_entries(value: Option<Tree>) -> Result<Vec<(Key, Node)>, StrategyError> {
    match value {
        None => Ok(Vec::new()),
        Some(Tree::Map(entries)) => entries
            .into_iter()
            .map(|(key, tree)| Ok((key, tree.into_node()?)))
            .collect(),
        Some(_) => Err(StrategyError::malformed("`@value` of a container must be a map")),
    }
}

/// Converts the raw value of a tagged scalar to the tagged type.
fn coerce(tag: &str, raw: Tree) -> Result<Scalar, StrategyError> {
    let raw = match raw {
        Tree::Null => Scalar::Null,
        Tree::Bool(b) => Scalar::Boolean(b),
        Tree::Int(i) => Scalar::Integer(i),
        Tree::Float(f) => Scalar::Float(f),
        Tree::Str(s) => Scalar::String(s),
        Tree::Map(_) => {
            return Err(StrategyError::Malformed(format!(
                "`@value` of a `{tag}` scalar must not be a map"
            )));
        }
    };

    Ok(match ScalarKind::from_tag(tag) {
        Some(ScalarKind::Null) => Scalar::Null,
        Some(ScalarKind::Integer) => Scalar::Integer(match raw {
            Scalar::Integer(i) => i,
            Scalar::Float(f) => f as i64,
            Scalar::Boolean(b) => i64::from(b),
            Scalar::String(s) => parse_int(&s),
            Scalar::Null => 0,
        }),
        Some(ScalarKind::Float) => Scalar::Float(match raw {
            Scalar::Integer(i) => i as f64,
            Scalar::Float(f) => f,
            Scalar::Boolean(b) => f64::from(u8::from(b)),
            Scalar::String(s) => s.trim().parse().unwrap_or(0.0),
            Scalar::Null => 0.0,
        }),
        Some(ScalarKind::Boolean) => Scalar::Boolean(match raw {
            Scalar::Boolean(b) => b,
            Scalar::Integer(i) => i != 0,
            Scalar::Float(f) => f != 0.0,
            Scalar::String(s) => !(s.is_empty() || s == "0"),
            Scalar::Null => false,
        }),
        Some(ScalarKind::String) | None => raw,
    })
}

/// The leading integer of `text`, `0` when there is none.
fn parse_int(text: &str) -> i64 {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    match text[..end].parse::<i64>() {
        Ok(i) => i,
        Err(_) => text.parse::<f64>().map_or(0, |f| f as i64),
    }
}

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Null => serializer.serialize_unit(),
            Tree::Bool(b) => serializer.serialize_bool(*b),
            Tree::Int(i) => serializer.serialize_i64(*i),
            Tree::Float(f) => serializer.serialize_f64(*f),
            Tree::Str(s) => serializer.serialize_str(s),
            Tree::Map(entries) => {
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    match key {
                        Key::Int(i) => state.serialize_entry(i, value)?,
                        Key::Str(s) => state.serialize_entry(s, value)?,
                    }
                }
                state.end()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        TreeSeed::new(usize::MAX).deserialize(deserializer)
    }
}

/// Deserializes a [`Tree`] no deeper than `max_depth` nested maps and
/// sequences.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeSeed {
    depth: usize,
    max_depth: usize,
}

impl TreeSeed {
    #[inline]
    pub const fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// The seed of the values one level down.
    fn enter<E: de::Error>(self) -> Result<Self, E> {
        if self.depth >= self.max_depth {
            return Err(E::custom(format_args!(
                "nesting exceeds {} levels",
                self.max_depth
            )));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }
}

impl<'de> DeserializeSeed<'de> for TreeSeed {
    type Value = Tree;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Tree, D::Error> {
        deserializer.deserialize_any(TreeVisitor(self))
    }
}

struct TreeVisitor(TreeSeed);

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a knot tree")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Tree, E> {
        Ok(Tree::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Tree, E> {
        Ok(Tree::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Tree, D::Error> {
        self.0.deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Tree, E> {
        Ok(Tree::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Tree, E> {
        Ok(Tree::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Tree, E> {
        // Integers beyond `i64` overflow to float.
        Ok(i64::try_from(v).map_or(Tree::Float(v as f64), Tree::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Tree, E> {
        Ok(Tree::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Tree, E> {
        Ok(Tree::Str(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Tree, E> {
        Ok(Tree::Str(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Tree, A::Error> {
        let seed = self.0.enter()?;
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(value) = seq.next_element_seed(seed)? {
            entries.push((Key::Int(entries.len() as i64), value));
        }
        Ok(Tree::Map(entries))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Tree, A::Error> {
        let seed = self.0.enter()?;
        let hint = map.size_hint().unwrap_or_default();
        let mut entries: Vec<(Key, Tree)> = Vec::with_capacity(hint);
        let mut positions: HashMap<Key, usize> = map_with_capacity(hint);

        while let Some(WireKey(key)) = map.next_key::<WireKey>()? {
            let value = map.next_value_seed(seed)?;
            match positions.get(&key) {
                Some(&at) => entries[at].1 = value,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }
        Ok(Tree::Map(entries))
    }
}

/// A map key, normalized like [`Array`](knot_object::Array) keys.
struct WireKey(Key);

impl<'de> Deserialize<'de> for WireKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WireKeyVisitor)
    }
}

struct WireKeyVisitor;

impl<'de> Visitor<'de> for WireKeyVisitor {
    type Value = WireKey;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a string or integer map key")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<WireKey, E> {
        Ok(WireKey(Key::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<WireKey, E> {
        Ok(WireKey(match i64::try_from(v) {
            Ok(i) => Key::Int(i),
            Err(_) => Key::Str(v.to_string()),
        }))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<WireKey, E> {
        Ok(WireKey(Key::from(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<WireKey, E> {
        Ok(WireKey(Key::from(v)))
    }
}

// -----------------------------------------------------------------------------
// Tests
