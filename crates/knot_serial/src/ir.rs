//! The intermediate representation shared by all strategies.

use std::fmt;

use knot_object::Key;

/// The `parent` marker of a [`Node::Fixed`].
pub const FIXED_PARENT: &str = "FixedArray";

// -----------------------------------------------------------------------------
// Scalar

/// Tag of a [`Scalar`], as written on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    Float,
    Boolean,
    String,
    Null,
}

impl ScalarKind {
    pub const fn tag(self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "boolean",
            ScalarKind::String => "string",
            ScalarKind::Null => "NULL",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "integer" => ScalarKind::Integer,
            "float" => ScalarKind::Float,
            "boolean" => ScalarKind::Boolean,
            "string" => ScalarKind::String,
            "NULL" => ScalarKind::Null,
            _ => return None,
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Null => ScalarKind::Null,
            Scalar::Boolean(_) => ScalarKind::Boolean,
            Scalar::Integer(_) => ScalarKind::Integer,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::String(_) => ScalarKind::String,
        }
    }
}

// -----------------------------------------------------------------------------
// Node

/// One node of the intermediate representation.
///
/// Objects are numbered by *visit index*: the first object met while walking
/// the graph gets `0`, the next new one `1`, and so on. An object met again
/// is emitted as a [`Node::Reference`] to its index.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    /// An ordered map; lists use integer keys `0..n`.
    Container(Vec<(Key, Node)>),
    /// The first occurrence of an object, with all its properties inlined.
    Object {
        type_name: String,
        properties: Vec<(String, Node)>,
    },
    /// A later occurrence of the object with this visit index.
    Reference(usize),
    /// The first occurrence of a fixed-size collection.
    ///
    /// Its parent type is always [`FIXED_PARENT`].
    Fixed {
        type_name: String,
        entries: Vec<(Key, Node)>,
    },
}

impl Node {
    #[inline]
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Number of nodes in this tree, `self` included.
    pub fn count(&self) -> usize {
        1 + match self {
            Node::Scalar(_) | Node::Reference(_) => 0,
            Node::Container(entries) | Node::Fixed { entries, .. } => {
                entries.iter().map(|(_, n)| n.count()).sum()
            }
            Node::Object { properties, .. } => properties.iter().map(|(_, n)| n.count()).sum(),
        }
    }
}

impl From<Scalar> for Node {
    #[inline]
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}
