use std::fmt;

use knot_utils::hash::{self, HashMap};

use crate::value::{Key, Value};

// -----------------------------------------------------------------------------
// Array

/// An insertion-ordered map from [`Key`] to [`Value`].
///
/// `Array` serves both as a list and as a dictionary:
///
/// - [`push`](Array::push) appends under the next free integer key
///   (one past the largest integer key seen so far, or `0`);
/// - [`insert`](Array::insert) replaces an existing entry *in place*, keeping
///   its position, or appends a new one.
///
/// # Examples
///
/// ```
/// use knot_object::{Array, Key, Value};
///
/// let mut fruit = Array::new();
/// fruit.push("apple");
/// fruit.push("pear");
/// fruit.insert("best", "fig");
/// fruit.insert(0, "plum");
///
/// let keys: Vec<_> = fruit.keys().cloned().collect();
/// assert_eq!(keys, [Key::Int(0), Key::Int(1), Key::from("best")]);
/// assert_eq!(fruit.get(0), Some(&Value::from("plum")));
/// ```
#[derive(Clone, Default)]
pub struct Array {
    entries: Vec<(Key, Value)>,
    positions: HashMap<Key, usize>,
    next_index: i64,
}

impl Array {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: hash::new_map(),
            next_index: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: hash::map_with_capacity(capacity),
            next_index: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| key.as_int() == i64::try_from(i).ok())
    }

    /// Appends `value` under the next free integer key and returns that key.
    pub fn push(&mut self, value: impl Into<Value>) -> i64 {
        let index = self.next_index;
        self.insert(Key::Int(index), value);
        index
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing entry keeps its position and its old value is returned.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into().normalized();
        let value = value.into();

        if let Some(&pos) = self.positions.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }

        if let Key::Int(i) = key
            && i >= self.next_index
        {
            self.next_index = i.saturating_add(1);
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        let pos = *self.positions.get(&key.into().normalized())?;
        Some(&self.entries[pos].1)
    }

    pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut Value> {
        let pos = *self.positions.get(&key.into().normalized())?;
        Some(&mut self.entries[pos].1)
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.positions.contains_key(&key.into().normalized())
    }

    /// Removes the entry under `key`, preserving the order of the others.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        let pos = self.positions.remove(&key.into().normalized())?;
        let (_, value) = self.entries.remove(pos);
        for (k, _) in &self.entries[pos..] {
            if let Some(p) = self.positions.get_mut(k) {
                *p -= 1;
            }
        }
        Some(value)
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Array {
    /// Arrays are equal when they hold equal entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl IntoIterator for Array {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = (&'a Key, &'a Value);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over the entries of an [`Array`], in order.
#[derive(Clone)]
pub struct Iter<'a>(std::slice::Iter<'a, (Key, Value)>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Key, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, v)| (k, v))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<V: Into<Value>> FromIterator<V> for Array {
    /// Builds a list with keys `0..n`.
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut array = Array::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for Array {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
