//! Store configuration supplied by the caller.

use crate::storage::schema::{TableSchema, model_table, producer_table};
use std::path::{Path, PathBuf};

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file, created if absent.
    File(PathBuf),
    /// A private in-memory database that disappears when the handle drops.
    Memory,
}

/// Everything needed to open and initialize a store.
///
/// # Examples
///
/// ```
/// use rowstore::storage::{StoreConfig, StoreLocation};
///
/// let config = StoreConfig::catalog(StoreLocation::Memory).with_foreign_keys(true);
/// assert_eq!(config.tables.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database location.
    pub location: StoreLocation,
    /// Tables created on init and allowed in queries.
    pub tables: Vec<TableSchema>,
    /// Turn on `PRAGMA foreign_keys`. Off by default, as in stock SQLite.
    pub enforce_foreign_keys: bool,
}

impl StoreConfig {
    /// A configuration with no tables.
    #[must_use]
    pub const fn new(location: StoreLocation) -> Self {
        Self {
            location,
            tables: Vec::new(),
            enforce_foreign_keys: false,
        }
    }

    /// A configuration with the producer and model tables.
    #[must_use]
    pub fn catalog(location: StoreLocation) -> Self {
        Self::new(location)
            .with_table(producer_table())
            .with_table(model_table())
    }

    /// Shorthand for a file-backed catalog store.
    #[must_use]
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self::catalog(StoreLocation::File(path.as_ref().to_path_buf()))
    }

    /// Adds a table definition.
    #[must_use]
    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    /// Sets foreign key enforcement.
    #[must_use]
    pub const fn with_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::{MODEL_TABLE, PRODUCER_TABLE};

    #[test]
    fn test_catalog_tables_in_dependency_order() {
        let config = StoreConfig::file("cars.db");
        let names: Vec<&str> = config.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, [PRODUCER_TABLE, MODEL_TABLE]);
        assert_eq!(config.location, StoreLocation::File(PathBuf::from("cars.db")));
        assert!(!config.enforce_foreign_keys);
    }
}
