//! `SQLite` store implementation.
//!
//! One [`SqliteStore`] owns one connection. There are no explicit
//! transactions: each statement autocommits before the call returns.

use crate::core::{ColumnMap, Row, Value};
use crate::error::{Result, StorageError};
use crate::storage::config::{StoreConfig, StoreLocation};
use crate::storage::query::{self, Statement};
use crate::storage::schema::SchemaRegistry;
use crate::storage::traits::{RowStore, StoreStats, TableStats};
use rusqlite::{Connection, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// SQLite-backed [`RowStore`].
///
/// # Examples
///
/// ```
/// use rowstore::core::{ColumnMap, Value};
/// use rowstore::storage::{RowStore, SqliteStore};
///
/// let mut store = SqliteStore::in_memory().unwrap();
/// store.init().unwrap();
/// let id = store.insert("Marka", vec![Value::from("Opel"), Value::from("Germany")]).unwrap();
/// let rows = store.select_where("Marka", &ColumnMap::new().with("id", id)).unwrap();
/// assert_eq!(rows.len(), 1);
/// ```
pub struct SqliteStore {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
    /// Identifier allow-list.
    registry: SchemaRegistry,
}

impl SqliteStore {
    /// Opens a store as described by `config`.
    ///
    /// File stores are created if absent, along with their parent
    /// directory. Tables are not created until [`RowStore::init`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConnectionFailed`] if the engine cannot open
    /// the database, or a configuration error for a malformed schema.
    pub fn connect(config: StoreConfig) -> Result<Self> {
        let registry = SchemaRegistry::new(config.tables)?;

        let (conn, path) = match config.location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                    && !parent.exists()
                {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::ConnectionFailed(format!("{}: {e}", parent.display()))
                    })?;
                }
                let conn = Connection::open(&path).map_err(|e| {
                    StorageError::ConnectionFailed(format!("{}: {e}", path.display()))
                })?;
                (conn, Some(path))
            }
            StoreLocation::Memory => {
                let conn = Connection::open_in_memory()
                    .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
                (conn, None)
            }
        };

        // The bundled library defaults this pragma to ON, so set it either way.
        let pragma = if config.enforce_foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!("PRAGMA foreign_keys = {pragma};"))
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        let foreign_keys = read_foreign_keys(&conn)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let location = path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
        info!(
            path = %location,
            sqlite = rusqlite::version(),
            foreign_keys,
            "opened store"
        );

        Ok(Self {
            conn,
            path,
            registry,
        })
    }

    /// Opens or creates a file-backed catalog store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::connect(StoreConfig::file(path))
    }

    /// Creates an in-memory catalog store.
    ///
    /// Useful for testing. The database lives as long as the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        Self::connect(StoreConfig::catalog(StoreLocation::Memory))
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The schema registry this store validates identifiers against.
    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Version of the linked SQLite library.
    #[must_use]
    pub fn sqlite_version() -> &'static str {
        rusqlite::version()
    }

    /// Whether the connection currently enforces foreign keys.
    ///
    /// Reads `PRAGMA foreign_keys` back from the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn foreign_keys_enforced(&self) -> Result<bool> {
        Ok(read_foreign_keys(&self.conn).map_err(|e| engine_error("PRAGMA foreign_keys", e))?)
    }

    /// Gathers per-table row counts and file information.
    ///
    /// # Errors
    ///
    /// Returns an error if a count query fails.
    pub fn stats(&self) -> Result<StoreStats> {
        let tables = self
            .registry
            .tables()
            .iter()
            .map(|t| {
                Ok(TableStats {
                    name: t.name.clone(),
                    rows: self.count(&t.name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(StoreStats {
            tables,
            foreign_keys: self.foreign_keys_enforced()?,
            sqlite_version: Self::sqlite_version().to_string(),
            path: self.path.as_ref().map(|p| p.display().to_string()),
            db_size: self
                .path
                .as_ref()
                .and_then(|p| std::fs::metadata(p).ok())
                .map(|m| m.len()),
        })
    }

    /// Runs a row-changing statement, returning the affected count.
    fn execute(&self, stmt: &Statement) -> Result<usize> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "execute");
        let affected = self
            .conn
            .execute(&stmt.sql, params_from_iter(stmt.params.iter()))
            .map_err(|e| engine_error(&stmt.sql, e))?;
        Ok(affected)
    }

    /// Runs a query, collecting every row as an ordered tuple.
    fn query(&self, stmt: &Statement) -> Result<Vec<Row>> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "query");
        let mut prepared = self
            .conn
            .prepare(&stmt.sql)
            .map_err(|e| engine_error(&stmt.sql, e))?;
        let width = prepared.column_count();

        let rows = prepared
            .query_map(params_from_iter(stmt.params.iter()), |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map(Row::new)
            })
            .map_err(|e| engine_error(&stmt.sql, e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| engine_error(&stmt.sql, e))?;

        Ok(rows)
    }
}

impl RowStore for SqliteStore {
    fn init(&mut self) -> Result<()> {
        let ddl: Vec<String> = self
            .registry
            .tables()
            .iter()
            .map(crate::storage::schema::TableSchema::create_sql)
            .collect();
        for sql in &ddl {
            self.run_statement(sql)?;
        }
        info!(tables = ddl.len(), "schema initialized");
        Ok(())
    }

    fn run_statement(&mut self, sql: &str) -> Result<()> {
        debug!(%sql, "run statement");
        self.conn
            .execute_batch(sql)
            .map_err(|e| engine_error(sql, e))?;
        Ok(())
    }

    fn insert(&mut self, table: &str, values: Vec<Value>) -> Result<i64> {
        let stmt = query::insert(self.registry.table(table)?, values)?;
        self.execute(&stmt)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn select_all(&self, table: &str) -> Result<Vec<Row>> {
        self.query(&query::select_all(self.registry.table(table)?))
    }

    fn select_where(&self, table: &str, filters: &ColumnMap) -> Result<Vec<Row>> {
        let stmt = query::select_where(self.registry.table(table)?, filters)?;
        self.query(&stmt)
    }

    fn update_by_id(&mut self, table: &str, id: i64, updates: &ColumnMap) -> Result<usize> {
        let stmt = query::update_by_id(self.registry.table(table)?, id, updates)?;
        let affected = self.execute(&stmt)?;
        if affected == 0 {
            debug!(table, id, "update matched no rows");
        }
        Ok(affected)
    }

    fn delete_where(&mut self, table: &str, filters: &ColumnMap) -> Result<usize> {
        let stmt = query::delete_where(self.registry.table(table)?, filters)?;
        self.execute(&stmt)
    }

    fn delete_all(&mut self, table: &str) -> Result<usize> {
        self.execute(&query::delete_all(self.registry.table(table)?))
    }

    fn count(&self, table: &str) -> Result<usize> {
        let stmt = query::count(self.registry.table(table)?);
        debug!(sql = %stmt.sql, "count");
        let count: i64 = self
            .conn
            .query_row(&stmt.sql, [], |row| row.get(0))
            .map_err(|e| engine_error(&stmt.sql, e))?;
        Ok(row_count(count)?)
    }
}

fn read_foreign_keys(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0))
        .map(|flag| flag != 0)
}

/// Converts an engine `COUNT(*)` into a row count.
fn row_count(count: i64) -> std::result::Result<usize, StorageError> {
    usize::try_from(count)
        .map_err(|_| StorageError::StatementFailed(format!("invalid row count: {count}")))
}

/// Classifies an engine failure and reports it.
fn engine_error(sql: &str, err: rusqlite::Error) -> StorageError {
    let err = StorageError::from(err);
    warn!(%sql, error = %err, "statement failed");
    err
}
