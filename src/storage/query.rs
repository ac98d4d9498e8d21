//! SQL statement builders.
//!
//! Each builder resolves every identifier against a [`TableSchema`] before
//! it is interpolated, and emits `?` placeholders for every value. Builders
//! do no I/O, so the exact SQL they produce is unit-testable.

use crate::core::{ColumnMap, Value};
use crate::error::StorageError;
use crate::storage::schema::{TableSchema, quote_identifier};

/// A rendered statement and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Parameters, one per placeholder, in order.
    pub params: Vec<Value>,
}

impl Statement {
    fn bare(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

/// `INSERT INTO t (c1, c2, ...) VALUES (?, ?, ...)` over the table's insert layout.
pub fn insert(table: &TableSchema, values: Vec<Value>) -> Result<Statement, StorageError> {
    let columns: Vec<String> = table
        .insert_columns()
        .map(|c| quote_identifier(&c.name))
        .collect();

    if columns.len() != values.len() {
        return Err(StorageError::ArityMismatch {
            table: table.name.clone(),
            expected: columns.len(),
            actual: values.len(),
        });
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            quote_identifier(&table.name),
            columns.join(", ")
        ),
        params: values,
    })
}

/// `SELECT * FROM t`.
#[must_use]
pub fn select_all(table: &TableSchema) -> Statement {
    Statement::bare(format!("SELECT * FROM {}", quote_identifier(&table.name)))
}

/// `SELECT * FROM t WHERE c1 = ? AND c2 = ? ...`.
pub fn select_where(table: &TableSchema, filters: &ColumnMap) -> Result<Statement, StorageError> {
    let (predicate, params) = conjunction(table, filters)?;
    Ok(Statement {
        sql: format!(
            "SELECT * FROM {} WHERE {predicate}",
            quote_identifier(&table.name)
        ),
        params,
    })
}

/// `UPDATE t SET a = ?, b = ? WHERE <pk> = ?`.
pub fn update_by_id(
    table: &TableSchema,
    id: i64,
    updates: &ColumnMap,
) -> Result<Statement, StorageError> {
    if updates.is_empty() {
        return Err(StorageError::EmptyUpdate {
            table: table.name.clone(),
        });
    }

    let mut assignments = Vec::with_capacity(updates.len());
    let mut params = Vec::with_capacity(updates.len() + 1);
    for (column, value) in updates.iter() {
        let column = table.find_column(column)?;
        assignments.push(format!("{} = ?", quote_identifier(&column.name)));
        params.push(value.clone());
    }
    params.push(Value::Integer(id));

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_identifier(&table.name),
            assignments.join(", "),
            quote_identifier(key_column(table))
        ),
        params,
    })
}

/// `DELETE FROM t WHERE c1 = ? AND c2 = ? ...`.
pub fn delete_where(table: &TableSchema, filters: &ColumnMap) -> Result<Statement, StorageError> {
    let (predicate, params) = conjunction(table, filters)?;
    Ok(Statement {
        sql: format!(
            "DELETE FROM {} WHERE {predicate}",
            quote_identifier(&table.name)
        ),
        params,
    })
}

/// `DELETE FROM t`.
#[must_use]
pub fn delete_all(table: &TableSchema) -> Statement {
    Statement::bare(format!("DELETE FROM {}", quote_identifier(&table.name)))
}

/// `SELECT COUNT(*) FROM t`.
#[must_use]
pub fn count(table: &TableSchema) -> Statement {
    Statement::bare(format!(
        "SELECT COUNT(*) FROM {}",
        quote_identifier(&table.name)
    ))
}

/// Builds `c1 = ? AND c2 = ?` in filter order.
fn conjunction(
    table: &TableSchema,
    filters: &ColumnMap,
) -> Result<(String, Vec<Value>), StorageError> {
    if filters.is_empty() {
        return Err(StorageError::EmptyFilter {
            table: table.name.clone(),
        });
    }

    let mut terms = Vec::with_capacity(filters.len());
    let mut params = Vec::with_capacity(filters.len());
    for (column, value) in filters.iter() {
        let column = table.find_column(column)?;
        // `= NULL` never matches; NULL filters need IS NULL.
        if value.is_null() {
            terms.push(format!("{} IS NULL", quote_identifier(&column.name)));
        } else {
            terms.push(format!("{} = ?", quote_identifier(&column.name)));
            params.push(value.clone());
        }
    }

    Ok((terms.join(" AND "), params))
}

/// Rowid alias used for id lookups; tables without one fall back to `rowid`.
fn key_column(table: &TableSchema) -> &str {
    table.primary_key().map_or("rowid", |c| c.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::{ColumnDef, model_table, producer_table};

    #[test]
    fn test_insert_sql() {
        let stmt = insert(
            &producer_table(),
            vec![Value::from("Opel"), Value::from("Niemcy")],
        )
        .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO \"Marka\" (\"name\", \"country\") VALUES (?, ?)"
        );
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn test_insert_arity() {
        let err = insert(&model_table(), vec![Value::from(1)]).unwrap_err();
        assert!(matches!(
            err,
            StorageError::ArityMismatch {
                expected: 4,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_select_where_clause_order() {
        let filters = ColumnMap::new().with("year", 2008).with("series", "1.9 TDI");
        let stmt = select_where(&model_table(), &filters).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"Model\" WHERE \"year\" = ? AND \"series\" = ?"
        );
        assert_eq!(
            stmt.params,
            vec![Value::Integer(2008), Value::Text("1.9 TDI".to_string())]
        );
    }

    #[test]
    fn test_null_filter_uses_is_null() {
        let filters = ColumnMap::new().with("country", Value::Null).with("name", "Kia");
        let stmt = select_where(&producer_table(), &filters).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"Marka\" WHERE \"country\" IS NULL AND \"name\" = ?"
        );
        assert_eq!(stmt.params, vec![Value::Text("Kia".to_string())]);
    }

    #[test]
    fn test_filter_uses_canonical_column_name() {
        let filters = ColumnMap::new().with("COUNTRY", "Japonia");
        let stmt = delete_where(&producer_table(), &filters).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM \"Marka\" WHERE \"country\" = ?");
    }

    #[test]
    fn test_empty_filter_rejected() {
        let err = select_where(&producer_table(), &ColumnMap::new()).unwrap_err();
        assert!(matches!(err, StorageError::EmptyFilter { .. }));
        let err = delete_where(&producer_table(), &ColumnMap::new()).unwrap_err();
        assert!(matches!(err, StorageError::EmptyFilter { .. }));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let filters = ColumnMap::new().with("name = name OR 1", 1);
        let err = select_where(&producer_table(), &filters).unwrap_err();
        assert!(matches!(err, StorageError::UnknownColumn { .. }));
    }

    #[test]
    fn test_update_sql() {
        let updates = ColumnMap::new().with("year", 2011).with("series", "1.0 VVT-i");
        let stmt = update_by_id(&model_table(), 4, &updates).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE \"Model\" SET \"year\" = ?, \"series\" = ? WHERE \"id\" = ?"
        );
        assert_eq!(stmt.params.last(), Some(&Value::Integer(4)));
    }

    #[test]
    fn test_update_empty_rejected() {
        let err = update_by_id(&model_table(), 1, &ColumnMap::new()).unwrap_err();
        assert!(matches!(err, StorageError::EmptyUpdate { .. }));
    }

    #[test]
    fn test_update_without_primary_key_uses_rowid() {
        let table = TableSchema::new("notes").column(ColumnDef::new("body", "text"));
        let stmt = update_by_id(&table, 1, &ColumnMap::new().with("body", "x")).unwrap();
        assert!(stmt.sql.ends_with("WHERE \"rowid\" = ?"));
    }

    #[test]
    fn test_bare_statements() {
        let table = producer_table();
        assert_eq!(select_all(&table).sql, "SELECT * FROM \"Marka\"");
        assert_eq!(delete_all(&table).sql, "DELETE FROM \"Marka\"");
        assert_eq!(count(&table).sql, "SELECT COUNT(*) FROM \"Marka\"");
        assert!(count(&table).params.is_empty());
    }
}
