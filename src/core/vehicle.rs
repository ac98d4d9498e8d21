//! Vehicle model records stored in the `Model` table.

use crate::core::{Row, Value};
use crate::error::StorageError;
use serde::{Deserialize, Serialize};

/// A vehicle model belonging to a [`Producer`](crate::core::Producer).
///
/// Columns other than `id` are nullable, as in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleModel {
    /// Row id (assigned by storage).
    pub id: Option<i64>,
    /// Id of the owning producer row. Not checked unless foreign keys are enforced.
    pub producer_id: Option<i64>,
    /// Model name, up to 25 characters.
    pub name: Option<String>,
    /// Production year.
    pub year: Option<i64>,
    /// Series or engine variant, up to 20 characters.
    pub series: Option<String>,
}

impl VehicleModel {
    /// Creates an unsaved model.
    #[must_use]
    pub fn new(
        producer_id: i64,
        name: impl Into<String>,
        year: i64,
        series: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            producer_id: Some(producer_id),
            name: Some(name.into()),
            year: Some(year),
            series: Some(series.into()),
        }
    }

    /// Values in `Model` insert order (`producer_id`, `name`, `year`, `series`).
    #[must_use]
    pub fn insert_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.producer_id),
            Value::from(self.name.clone()),
            Value::from(self.year),
            Value::from(self.series.clone()),
        ]
    }
}

impl TryFrom<&Row> for VehicleModel {
    type Error = StorageError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        let decode_err = |reason: &str| StorageError::RowDecode {
            record: "VehicleModel",
            reason: reason.to_string(),
        };

        if row.len() != 5 {
            return Err(decode_err(&format!("expected 5 columns, got {}", row.len())));
        }

        let integer = |idx: usize, column: &str| match row.get(idx) {
            Some(Value::Null) => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            _ => Err(decode_err(&format!("{column} is not an integer"))),
        };
        let text = |idx: usize, column: &str| match row.get(idx) {
            Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            _ => Err(decode_err(&format!("{column} is not text"))),
        };

        Ok(Self {
            id: Some(row.get_i64(0).ok_or_else(|| decode_err("id is not an integer"))?),
            producer_id: integer(1, "producer_id")?,
            name: text(2, "name")?,
            year: integer(3, "year")?,
            series: text(4, "series")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_values_order() {
        let model = VehicleModel::new(1, "Astra F", 2000, "Sedan 1.4");
        assert_eq!(
            model.insert_values(),
            vec![
                Value::Integer(1),
                Value::Text("Astra F".to_string()),
                Value::Integer(2000),
                Value::Text("Sedan 1.4".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_row_year_as_text() {
        let row = Row::new(vec![
            Value::Integer(1),
            Value::Integer(1),
            Value::Text("Astra F".to_string()),
            Value::Text("two thousand".to_string()),
            Value::Text("Sedan 1.4".to_string()),
        ]);
        let err = VehicleModel::try_from(&row).unwrap_err();
        assert!(err.to_string().contains("year"));
    }

    #[test]
    fn test_from_row_null_year() {
        let row = Row::new(vec![
            Value::Integer(4),
            Value::Integer(1),
            Value::Text("Astra F".to_string()),
            Value::Null,
            Value::Null,
        ]);
        let model = VehicleModel::try_from(&row).unwrap();
        assert_eq!(model.year, None);
        assert_eq!(model.series, None);
        assert_eq!(model.name.as_deref(), Some("Astra F"));
    }
}
