//! Decoded query parameters and the single/multi field value shared by every token source.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::BodyError;

/// A field read from a header, query string or form body.
///
/// A key that appears once is [`FieldValue::Single`]; a repeated key, a comma
/// joined header or an array form field is [`FieldValue::Multi`] in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

impl FieldValue {
    /// The candidate an override is taken from: the value itself, or the first element.
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Single(v) => Some(v.as_str()),
            FieldValue::Multi(vec) => vec.first().map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValue::Single(_) => 1,
            FieldValue::Multi(vec) => vec.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(v) => {
                let first = std::mem::take(v);
                *self = FieldValue::Multi(vec![first, value]);
            }
            FieldValue::Multi(vec) => vec.push(value),
        }
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            FieldValue::Single(values.remove(0))
        } else {
            FieldValue::Multi(values)
        }
    }
}

/// An already decoded query string, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    data: HashMap<String, FieldValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Result<Self, BodyError> {
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query).map_err(BodyError::invalid_form)?;
        Ok(pairs.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.data.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(FieldValue::Single(value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::hash_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
