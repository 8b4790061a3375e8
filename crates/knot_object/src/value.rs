use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::array::Array;
use crate::heap::ObjectId;

// -----------------------------------------------------------------------------
// Key

/// Key of an [`Array`] entry.
///
/// Strings that spell a canonical decimal integer are normalized to
/// [`Key::Int`], so `"7"` and `7` address the same entry.
///
/// # Examples
///
/// ```
/// use knot_object::Key;
///
/// assert_eq!(Key::from("7"), Key::Int(7));
/// assert_eq!(Key::from("07"), Key::Str("07".into()));
/// assert_eq!(Key::from("-3"), Key::Int(-3));
/// assert_eq!(Key::from("-0"), Key::Str("-0".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Parses a canonical decimal integer: optional `-`, no leading zeros,
    /// within `i64`.
    fn canonical_int(text: &str) -> Option<i64> {
        let digits = text.strip_prefix('-').unwrap_or(text);
        let canonical = match digits.as_bytes() {
            [] => false,
            [b'0'] => digits.len() == text.len(),
            [first, rest @ ..] => {
                matches!(first, b'1'..=b'9') && rest.iter().all(u8::is_ascii_digit)
            }
        };
        if canonical { text.parse().ok() } else { None }
    }

    /// Turns a string key spelling a canonical integer into [`Key::Int`].
    pub fn normalized(self) -> Key {
        match self {
            Key::Str(s) => Key::from(s),
            key => key,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s),
        }
    }
}

impl From<i64> for Key {
    #[inline]
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    #[inline]
    fn from(value: i32) -> Self {
        Key::Int(value.into())
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        match Key::canonical_int(value) {
            Some(i) => Key::Int(i),
            None => Key::Str(value.to_owned()),
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        match Key::canonical_int(&value) {
            Some(i) => Key::Int(i),
            None => Key::Str(value),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

// -----------------------------------------------------------------------------
// Callable

/// An opaque callable value.
///
/// Callables can live inside a value graph but can never be serialized.
#[derive(Clone)]
pub struct Callable {
    name: Cow<'static, str>,
    func: Arc<dyn Fn(&[Value]) -> Value + Send + Sync>,
}

impl Callable {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl PartialEq for Callable {
    /// Two callables are equal when they share the same function object.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").field(&self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// Resource

/// A handle to an external resource such as an open stream or socket.
///
/// Only the handle is stored; the resource itself is owned elsewhere.
/// Resources can never be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    kind: Cow<'static, str>,
    handle: u64,
}

impl Resource {
    #[inline]
    pub fn new(kind: impl Into<Cow<'static, str>>, handle: u64) -> Self {
        Self {
            kind: kind.into(),
            handle,
        }
    }

    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    pub fn handle(&self) -> u64 {
        self.handle
    }
}

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value of the object graph.
///
/// Objects are referenced by [`ObjectId`]: two `Value::Object` holding the
/// same id are the same object, not two equal copies.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Array),
    Object(ObjectId),
    Callable(Callable),
    Resource(Resource),
}

/// Discriminant of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Array,
    Object,
    Callable,
    Resource,
}

impl ValueKind {
    /// The name used for this kind in diagnostics and scalar tags.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "NULL",
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Callable => "callable",
            ValueKind::Resource => "resource",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Callable(_) => ValueKind::Callable,
            Value::Resource(_) => ValueKind::Resource,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null, booleans, numbers and strings.
    #[inline]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Array> for Value {
    #[inline]
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectId> for Value {
    #[inline]
    fn from(value: ObjectId) -> Self {
        Value::Object(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Callable, Key, Value, ValueKind};

    #[test]
    fn key_normalization() {
        assert_eq!(Key::from("0"), Key::Int(0));
        assert_eq!(Key::from("42"), Key::Int(42));
        assert_eq!(Key::from("-42"), Key::Int(-42));
        assert_eq!(Key::from("007"), Key::Str("007".into()));
        assert_eq!(Key::from("1.5"), Key::Str("1.5".into()));
        assert_eq!(Key::from(""), Key::Str(String::new()));
        assert_eq!(Key::from("-"), Key::Str("-".into()));
        assert_eq!(Key::from("99999999999999999999"), Key::Str("99999999999999999999".into()));
    }

    #[test]
    fn callable_identity() {
        let a = Callable::new("double", |args| match args {
            [Value::Int(i)] => Value::Int(i * 2),
            _ => Value::Null,
        });
        let b = a.clone();
        let c = Callable::new("double", |_| Value::Null);

        assert_eq!(a.call(&[Value::Int(4)]), Value::Int(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn kinds() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from(1.5).kind().name(), "float");
        assert!(Value::from("x").is_scalar());
    }
}
