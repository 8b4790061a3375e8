use crate::error::{FieldError, FixedIndexError};
use crate::object::{FixedCollection, Object, ObjectKind};
use crate::registry::{ObjectType, TypeMeta};
use crate::value::Value;

// -----------------------------------------------------------------------------
// FixedArray

/// A list of values whose size is fixed at construction.
///
/// Slots start out as [`Value::Null`].
///
/// # Examples
///
/// ```
/// use knot_object::{FixedArray, Value};
///
/// let mut slots = FixedArray::new(2);
/// slots.set(1, Value::from("b")).unwrap();
///
/// assert_eq!(slots.as_slice(), [Value::Null, Value::from("b")]);
/// assert!(slots.set(2, Value::Null).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixedArray {
    elements: Box<[Value]>,
}

impl FixedArray {
    pub fn new(size: usize) -> Self {
        Self {
            elements: vec![Value::Null; size].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<(), FixedIndexError> {
        let size = self.elements.len();
        match self.elements.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FixedIndexError { index, size }),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Value> {
        self.elements.into_vec()
    }
}

impl From<Vec<Value>> for FixedArray {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self {
            elements: value.into_boxed_slice(),
        }
    }
}

impl FromIterator<Value> for FixedArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl FixedCollection for FixedArray {
    #[inline]
    fn size(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    fn element(&self, index: usize) -> Option<Value> {
        self.elements.get(index).cloned()
    }

    #[inline]
    fn set_element(&mut self, index: usize, value: Value) -> Result<(), FixedIndexError> {
        self.set(index, value)
    }
}

impl Object for FixedArray {
    #[inline]
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    #[inline]
    fn kind(&self) -> ObjectKind {
        ObjectKind::FixedArray
    }

    #[inline]
    fn field_names(&self) -> &'static [&'static str] {
        &[]
    }

    #[inline]
    fn field(&self, _: &str) -> Option<Value> {
        None
    }

    #[inline]
    fn set_field(&mut self, _: &str, value: Value) -> Result<(), FieldError> {
        Err(FieldError::NotFound(value))
    }

    #[inline]
    fn as_fixed(&self) -> Option<&dyn FixedCollection> {
        Some(self)
    }

    #[inline]
    fn as_fixed_mut(&mut self) -> Option<&mut dyn FixedCollection> {
        Some(self)
    }
}

impl ObjectType for FixedArray {
    const TYPE_NAME: &'static str = "FixedArray";

    fn type_meta() -> TypeMeta {
        TypeMeta::with_size(Self::TYPE_NAME, |size| Box::new(FixedArray::new(size)))
    }
}

// -----------------------------------------------------------------------------
// Tests
