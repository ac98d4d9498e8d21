//! Result rows.

use crate::core::Value;
use serde::{Deserialize, Serialize};

/// One result row: column values in the table's declared column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from ordered values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a column position.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Integer value at a column position.
    #[must_use]
    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        self.get(idx).and_then(Value::as_i64)
    }

    /// Text value at a column position.
    #[must_use]
    pub fn get_str(&self, idx: usize) -> Option<&str> {
        self.get(idx).and_then(Value::as_str)
    }

    /// Borrows all values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}
