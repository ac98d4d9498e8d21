//! Storage layer for rowstore.
//!
//! Provides the generic row accessor over `SQLite`: configuration, the
//! schema registry used as an identifier allow-list, SQL builders, and the
//! connection-owning store.

pub mod config;
pub mod query;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use config::{StoreConfig, StoreLocation};
pub use schema::{
    Affinity, ColumnDef, MODEL_TABLE, PRODUCER_TABLE, PrimaryKey, SchemaRegistry, TableSchema, model_table,
    producer_table,
};
pub use sqlite::SqliteStore;
pub use traits::{Catalog, RowStore, StoreStats, TableStats};

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "rowstore.db";
