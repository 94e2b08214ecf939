//! Query parameters and form payloads.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Ordered string parameters.
///
/// Used both for query strings and for form-encoded `POST`/`PUT` payloads.
/// Keys keep their insertion order on the wire; inserting an existing key
/// replaces its value in place. Values are always sent as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> Option<String> {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over `(key, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add every entry of `defaults` whose key is not already set.
    ///
    /// Existing values always win.
    pub fn fill_missing(&mut self, defaults: &Params) {
        for (key, value) in defaults.iter() {
            if !self.contains_key(key) {
                self.pairs.push((key.to_string(), value.to_string()));
            }
        }
    }

    /// Convert into a JSON object. Keys come out sorted.
    pub fn to_json(&self) -> serde_json::Value {
        let sorted: BTreeMap<&str, &str> = self.iter().collect();
        let map: serde_json::Map<String, serde_json::Value> = sorted
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn to_form(&self) -> crate::Result<String> {
        serde_urlencoded::to_string(self).map_err(|e| crate::ApiError::Codec(e.to_string()))
    }
}

/// Merge call-time parameters with the client defaults.
///
/// Call-time values take precedence; defaults only fill keys the call left
/// unset.
pub fn merge_defaults(call: Params, defaults: &Params) -> Params {
    let mut merged = call;
    merged.fill_missing(defaults);
    merged
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Display> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Display, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
