//! Flat metric-name to value mappings produced by collectors.
//!
//! A [`MetricsMap`] keeps keys in insertion order so that indexed keys such
//! as `entry#0`, `entry#1`, ... come out in the order they were produced,
//! which a sorted map would not preserve past `entry#9`.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// A single reported value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Number(u64),
    Text(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<u64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Number(_) => None,
            MetricValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        MetricValue::Number(value as u64)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// Insertion-ordered metric mapping.
#[derive(Debug, Clone, Default)]
pub struct MetricsMap {
    entries: IndexMap<String, MetricValue, FxBuildHasher>,
}

impl MetricsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    /// Sets `key` to `value`. An existing key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetricValue>,
    ) -> Option<MetricValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// Order-sensitive, unlike `IndexMap`'s own equality.
impl PartialEq for MetricsMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for MetricsMap {}

impl<K, V> FromIterator<(K, V)> for MetricsMap
where
    K: Into<String>,
    V: Into<MetricValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MetricsMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for MetricsMap {
    type Item = (String, MetricValue);
    type IntoIter = indexmap::map::IntoIter<String, MetricValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
