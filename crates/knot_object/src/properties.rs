use std::fmt;

use knot_utils::hash::{self, HashMap};

use crate::convert::FromValue;
use crate::error::HydrateError;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Properties

/// An insertion-ordered map from property name to [`Value`].
///
/// Used as the dynamic-property store of objects and as the input of
/// hydration functions.
///
/// # Examples
///
/// ```
/// use knot_object::{Properties, Value};
///
/// let mut props = Properties::new();
/// props.insert("b", 1);
/// props.insert("a", 2);
/// props.insert("b", 3);
///
/// let names: Vec<_> = props.names().collect();
/// assert_eq!(names, ["b", "a"]);
/// assert_eq!(props.get("b"), Some(&Value::Int(3)));
/// ```
#[derive(Clone, Default)]
pub struct Properties {
    entries: Vec<(String, Value)>,
    positions: HashMap<String, usize>,
}

impl Properties {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: hash::new_map(),
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

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let pos = *self.positions.get(name)?;
        Some(&self.entries[pos].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let pos = *self.positions.get(name)?;
        Some(&mut self.entries[pos].1)
    }

    /// Inserts or replaces a property; a replaced property keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        if let Some(&pos) = self.positions.get(&name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.positions.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.positions.remove(name)?;
        let (_, value) = self.entries.remove(pos);
        for (n, _) in &self.entries[pos..] {
            if let Some(p) = self.positions.get_mut(n) {
                *p -= 1;
            }
        }
        Some(value)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[inline]
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Reads a required property for a hydration function.
    ///
    /// # Examples
    ///
    /// ```
    /// use knot_object::{HydrateError, Properties};
    ///
    /// let mut props = Properties::new();
    /// props.insert("y", 2024);
    ///
    /// assert_eq!(props.require::<i64>("y"), Ok(2024));
    /// assert_eq!(props.require::<i64>("m"), Err(HydrateError::Missing("m")));
    /// ```
    pub fn require<T: FromValue>(&self, name: &'static str) -> Result<T, HydrateError> {
        let value = self.get(name).ok_or(HydrateError::Missing(name))?;
        T::from_value(value.clone()).map_err(|source| HydrateError::Convert { name, source })
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}

impl IntoIterator for Properties {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Properties;
    use crate::value::Value;

    #[test]
    fn remove_reindexes() {
        let mut props: Properties = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(props.remove("a"), Some(Value::Int(1)));
        assert_eq!(props.get("c"), Some(&Value::Int(3)));
        props.insert("c", 4);
        assert_eq!(props.len(), 2);
        assert_eq!(props.names().collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn require_reports_conversion() {
        let props: Properties = [("s", "text")].into_iter().collect();
        assert!(props.require::<i64>("s").is_err());
        assert_eq!(props.require::<String>("s"), Ok("text".to_owned()));
    }
}
