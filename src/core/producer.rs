//! Producer (brand) records stored in the `Marka` table.

use crate::core::{Row, Value};
use crate::error::StorageError;
use serde::{Deserialize, Serialize};

/// A vehicle producer.
///
/// Every column except `id` is nullable in the table, so the record keeps
/// them optional.
///
/// # Examples
///
/// ```
/// use rowstore::core::Producer;
///
/// let opel = Producer::new("Opel", "Germany");
/// assert!(opel.id.is_none());
/// assert_eq!(opel.name.as_deref(), Some("Opel"));
/// assert_eq!(opel.insert_values().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    /// Row id (assigned by storage).
    pub id: Option<i64>,
    /// Brand name, up to 20 characters.
    pub name: Option<String>,
    /// Country of production, up to 25 characters.
    pub country: Option<String>,
}

impl Producer {
    /// Creates an unsaved producer.
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            country: Some(country.into()),
        }
    }

    /// Values in `Marka` insert order (`name`, `country`).
    #[must_use]
    pub fn insert_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.name.clone()),
            Value::from(self.country.clone()),
        ]
    }
}

impl TryFrom<&Row> for Producer {
    type Error = StorageError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let decode_err = |reason: &str| StorageError::RowDecode {
            record: "Producer",
            reason: reason.to_string(),
        };

        if row.len() != 3 {
            return Err(decode_err(&format!("expected 3 columns, got {}", row.len())));
        }

        let text = |idx: usize, column: &str| match row.get(idx) {
            Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            _ => Err(decode_err(&format!("{column} is not text"))),
        };

        Ok(Self {
            id: Some(row.get_i64(0).ok_or_else(|| decode_err("id is not an integer"))?),
            name: text(1, "name")?,
            country: text(2, "country")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row() {
        let row = Row::new(vec![
            Value::Integer(2),
            Value::Text("Kia".to_string()),
            Value::Text("SouthKorea".to_string()),
        ]);
        let producer = Producer::try_from(&row).unwrap();
        assert_eq!(producer.id, Some(2));
        assert_eq!(producer.name.as_deref(), Some("Kia"));
        assert_eq!(producer.country.as_deref(), Some("SouthKorea"));
    }

    #[test]
    fn test_from_row_wrong_shape() {
        let row = Row::new(vec![Value::Integer(1)]);
        let err = Producer::try_from(&row).unwrap_err();
        assert!(matches!(err, StorageError::RowDecode { .. }));
    }

    #[test]
    fn test_from_row_null_columns() {
        let row = Row::new(vec![Value::Integer(1), Value::Null, Value::Null]);
        let producer = Producer::try_from(&row).unwrap();
        assert_eq!(producer.name, None);
        assert_eq!(producer.country, None);
        assert_eq!(producer.insert_values(), vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_from_row_blob_name() {
        let row = Row::new(vec![
            Value::Integer(1),
            Value::Blob(vec![0xff]),
            Value::Null,
        ]);
        let err = Producer::try_from(&row).unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
