//! Storage trait definitions.
//!
//! [`RowStore`] is the generic accessor: table-parameterized CRUD over an
//! open handle. [`Catalog`] layers typed producer/model helpers on top of
//! any `RowStore`.

use crate::core::{ColumnMap, Producer, Row, Value, VehicleModel};
use crate::error::{Result, StorageError};
use crate::storage::schema::{MODEL_TABLE, PRODUCER_TABLE};
use serde::Serialize;
use tracing::warn;

/// Generic row access over an open store handle.
///
/// Every call is a complete unit of work: mutations are committed by the
/// engine before the call returns. Table and column names are checked
/// against the store's schema registry before any SQL runs.
pub trait RowStore {
    /// Creates every configured table if it does not exist.
    ///
    /// Idempotent - safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    fn init(&mut self) -> Result<()>;

    /// Executes one non-parameterized statement (DDL and the like).
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the statement.
    fn run_statement(&mut self, sql: &str) -> Result<()>;

    /// Inserts a row using the table's fixed insert layout.
    ///
    /// `values` are ordered like the table's columns, minus the
    /// auto-assigned primary key. Returns the new row id.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown table, wrong value count, or a
    /// failed insert.
    fn insert(&mut self, table: &str, values: Vec<Value>) -> Result<i64>;

    /// Returns every row in the table, in the engine's default order.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown table or a failed query.
    fn select_all(&self, table: &str) -> Result<Vec<Row>>;

    /// Returns the rows matching every `column = value` pair in `filters`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty filter, unknown identifiers, or a
    /// failed query.
    fn select_where(&self, table: &str, filters: &ColumnMap) -> Result<Vec<Row>>;

    /// Sets the given columns on the row with primary key `id`.
    ///
    /// Returns the number of rows changed (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error for an empty update, unknown identifiers, or a
    /// failed statement.
    fn update_by_id(&mut self, table: &str, id: i64, updates: &ColumnMap) -> Result<usize>;

    /// Deletes the rows matching every `column = value` pair in `filters`.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty filter, unknown identifiers, or a
    /// failed statement.
    fn delete_where(&mut self, table: &str, filters: &ColumnMap) -> Result<usize>;

    /// Deletes every row, leaving the table in place.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown table or a failed statement.
    fn delete_all(&mut self, table: &str) -> Result<usize>;

    /// Counts the rows in a table.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown table or a failed query.
    fn count(&self, table: &str) -> Result<usize>;
}

/// Typed producer and model helpers.
///
/// Blanket-implemented for every [`RowStore`].
pub trait Catalog: RowStore {
    /// Inserts a producer, returning its id.
    fn add_producer(&mut self, producer: &Producer) -> Result<i64> {
        self.insert(PRODUCER_TABLE, producer.insert_values())
    }

    /// Inserts a model, returning its id.
    fn add_model(&mut self, model: &VehicleModel) -> Result<i64> {
        self.insert(MODEL_TABLE, model.insert_values())
    }

    /// All producers.
    fn producers(&self) -> Result<Vec<Producer>> {
        Ok(decode_rows(&self.select_all(PRODUCER_TABLE)?))
    }

    /// All models.
    fn models(&self) -> Result<Vec<VehicleModel>> {
        Ok(decode_rows(&self.select_all(MODEL_TABLE)?))
    }

    /// Producers from the given country.
    fn producers_in(&self, country: &str) -> Result<Vec<Producer>> {
        let filters = ColumnMap::new().with("country", country);
        Ok(decode_rows(&self.select_where(PRODUCER_TABLE, &filters)?))
    }

    /// Models produced in the given year.
    fn models_by_year(&self, year: i64) -> Result<Vec<VehicleModel>> {
        let filters = ColumnMap::new().with("year", year);
        Ok(decode_rows(&self.select_where(MODEL_TABLE, &filters)?))
    }

    /// Models belonging to a producer.
    fn models_by_producer(&self, producer_id: i64) -> Result<Vec<VehicleModel>> {
        let filters = ColumnMap::new().with("producer_id", producer_id);
        Ok(decode_rows(&self.select_where(MODEL_TABLE, &filters)?))
    }
}

impl<S: RowStore + ?Sized> Catalog for S {}

/// Decodes rows into typed records.
///
/// Rows holding values of the wrong type (possible through the generic
/// accessor) are skipped with a warning instead of failing the whole query.
fn decode_rows<'a, T>(rows: &'a [Row]) -> Vec<T>
where
    T: TryFrom<&'a Row, Error = StorageError>,
{
    rows.iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, row = ?row.get(0), "skipping undecodable row");
                None
            }
        })
        .collect()
}

/// Per-table row counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// `(table, rows)` in schema order.
    pub tables: Vec<TableStats>,
    /// Whether foreign keys are enforced on this connection.
    pub foreign_keys: bool,
    /// Bundled SQLite library version.
    pub sqlite_version: String,
    /// Database file path, `None` for in-memory stores.
    pub path: Option<String>,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}

/// Row count for one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    /// Table name.
    pub name: String,
    /// Number of rows.
    pub rows: usize,
}
