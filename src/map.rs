//! Ordered map type for plist dictionaries.
//!
//! This module provides [`Dictionary`], a wrapper around [`IndexMap`] that
//! keeps keys in the order they were read from the file (or inserted), so a
//! decoded dictionary re-encodes with the same key order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bplist::{Dictionary, Value};
//!
//! let mut dict = Dictionary::new();
//! dict.insert("CFBundleName".to_string(), Value::from("Demo"));
//! dict.insert("CFBundleVersion".to_string(), Value::from(3));
//!
//! assert_eq!(dict.len(), 2);
//! assert_eq!(dict.get("CFBundleName").and_then(|v| v.as_str()), Some("Demo"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to plist values.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::{Dictionary, Value};
///
/// let mut dict = Dictionary::new();
/// dict.insert("first".to_string(), Value::from(1));
/// dict.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = dict.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary(IndexMap<String, crate::Value>);

impl Dictionary {
    /// Creates an empty `Dictionary`.
    #[must_use]
    pub fn new() -> Self {
        Dictionary(IndexMap::new())
    }

    /// Creates an empty `Dictionary` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Dictionary(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// (keeping the original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bplist::{Dictionary, Value};
    ///
    /// let mut dict = Dictionary::new();
    /// assert!(dict.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(dict.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.0.get_mut(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.0.shift_remove(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, crate::Value>> for Dictionary {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        Dictionary(map.into_iter().collect())
    }
}

impl From<Dictionary> for HashMap<String, crate::Value> {
    fn from(map: Dictionary) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        Dictionary(IndexMap::from_iter(iter))
    }
}
