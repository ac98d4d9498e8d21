//! Ordered column-to-value mappings.
//!
//! A [`ColumnMap`] is both the filter of a conjunctive equality predicate
//! and the assignment list of an update. Clause order in the generated SQL
//! follows insertion order, so identical inputs always produce identical
//! statements.

use crate::core::Value;
use serde::Serialize;

/// An insertion-ordered mapping of column name to value.
///
/// Column names compare ASCII case-insensitively, matching SQLite's
/// identifier rules. Setting a column that is already present replaces its
/// value without moving it.
///
/// # Examples
///
/// ```
/// use rowstore::core::ColumnMap;
///
/// let filter = ColumnMap::new().with("country", "Germany").with("name", "Opel");
/// let columns: Vec<&str> = filter.columns().collect();
/// assert_eq!(columns, ["country", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ColumnMap {
    entries: Vec<(String, Value)>,
}

impl ColumnMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ColumnMap::set`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column, replacing any earlier value for it in place.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&column))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Looks up a column's value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let map = ColumnMap::new()
            .with("year", 2008)
            .with("series", "1.9 TDI")
            .with("name", "Passat B6");
        let columns: Vec<&str> = map.columns().collect();
        assert_eq!(columns, ["year", "series", "name"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let map = ColumnMap::new()
            .with("year", 2000)
            .with("name", "Astra F")
            .with("YEAR", 2011);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("year"), Some(&Value::Integer(2011)));
        let columns: Vec<&str> = map.columns().collect();
        assert_eq!(columns, ["year", "name"]);
    }

    #[test]
    fn test_from_iterator() {
        let map: ColumnMap = vec![("country", "Niemcy"), ("name", "Opel")]
            .into_iter()
            .collect();
        assert_eq!(map.get("name"), Some(&Value::Text("Opel".to_string())));
        assert!(!map.is_empty());
    }
}
