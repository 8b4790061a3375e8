//! Conversions between Rust field types and [`Value`].
//!
//! Derived [`Object`](crate::Object) implementations read fields through
//! [`ToValue`] and write them through [`FromValue`].

use thiserror::Error;

use crate::array::Array;
use crate::heap::ObjectId;
use crate::value::{Value, ValueKind};

// -----------------------------------------------------------------------------
// Error

/// A [`Value`] could not be converted into the requested Rust type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, found {found}")]
pub struct ConvertError {
    pub expected: &'static str,
    pub found: ValueKind,
}

impl ConvertError {
    #[inline]
    pub const fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.kind(),
        }
    }
}

// -----------------------------------------------------------------------------
// Traits

/// Reads a field as a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Writes a field from a [`Value`].
///
/// Conversions are strict: an integer is not accepted for a string field.
/// The only widening allowed is integer to float.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

// -----------------------------------------------------------------------------
// Implementations

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ConvertError::new("boolean", &other)),
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConvertError> {
                match value {
                    Value::Int(i) => <$ty>::try_from(i)
                        .map_err(|_| ConvertError::new(stringify!($ty), &Value::Int(i))),
                    other => Err(ConvertError::new(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(ConvertError::new("float", &other)),
        }
    }
}

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ConvertError::new("string", &other)),
        }
    }
}

impl ToValue for Array {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }
}

impl FromValue for Array {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Array(a) => Ok(a),
            other => Err(ConvertError::new("array", &other)),
        }
    }
}

impl ToValue for ObjectId {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(*self)
    }
}

impl FromValue for ObjectId {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Object(id) => Ok(id),
            other => Err(ConvertError::new("object", &other)),
        }
    }
}

/// `None` is `Value::Null`.
impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// A `Vec` is a list [`Array`].
impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(ToValue::to_value).collect())
    }
}

/// Accepts any array; keys are dropped and values are taken in order.
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Array(a) => a.into_iter().map(|(_, v)| T::from_value(v)).collect(),
            other => Err(ConvertError::new("array", &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ConvertError, FromValue, ToValue};
    use crate::value::{Value, ValueKind};

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(u8::from_value(Value::Int(255)), Ok(255));
        assert_eq!(
            u8::from_value(Value::Int(256)),
            Err(ConvertError {
                expected: "u8",
                found: ValueKind::Int
            })
        );
        assert!(i32::from_value(Value::from("1")).is_err());
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_value(Value::Int(3)), Ok(3.0));
        assert_eq!(f32::from_value(Value::Float(0.5)), Ok(0.5));
    }

    #[test]
    fn option_and_vec() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(Some(7_i64).to_value(), Value::Int(7));

        let list = vec![1_i32, 2, 3].to_value();
        assert_eq!(Vec::<i32>::from_value(list), Ok(vec![1, 2, 3]));
        assert!(Vec::<i32>::from_value(Value::Bool(true)).is_err());
    }
}
