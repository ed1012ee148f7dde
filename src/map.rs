//! Ordered map type for objects and record fields.
//!
//! [`ObjectMap`] wraps an [`IndexMap`] so that keys are emitted in the order
//! they were inserted. The format depends on this: a mapping serializes in its
//! iteration order and a record serializes its fields in declaration order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_classjson::{ObjectMap, Value};
//!
//! let mut map = ObjectMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to values.
///
/// # Examples
///
/// ```rust
/// use serde_classjson::{ObjectMap, Value};
///
/// let mut map = ObjectMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectMap(IndexMap<String, Value>);

impl ObjectMap {
    #[must_use]
    pub fn new() -> Self {
        ObjectMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ObjectMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_classjson::{ObjectMap, Value};
    ///
    /// let mut map = ObjectMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for ObjectMap {
    fn from(map: HashMap<String, Value>) -> Self {
        ObjectMap(map.into_iter().collect())
    }
}

impl From<ObjectMap> for HashMap<String, Value> {
    fn from(map: ObjectMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for ObjectMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ObjectMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ObjectMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_preserves_order() {
        let mut map: ObjectMap = ["a", "b", "c"]
            .iter()
            .map(|k| (k.to_string(), Value::Null))
            .collect();
        assert_eq!(map.remove("a"), Some(Value::Null));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = ObjectMap::new();
        map.insert("x".to_string(), Value::from(1));
        map.insert("y".to_string(), Value::from(2));
        map.insert("x".to_string(), Value::from(3));
        let pairs: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.as_i64())).collect();
        assert_eq!(pairs, vec![("x", Some(3)), ("y", Some(2))]);
    }
}
