//! # rowstore
//!
//! A small data-access layer over an embedded `SQLite` store.
//!
//! rowstore keeps a producer table (`Marka`) and a model table (`Model`)
//! and exposes generic CRUD helpers that build parameterized SQL from
//! ordered column maps.
//!
//! ## Features
//!
//! - **Generic accessor**: insert, select-all, select-by-filter,
//!   update-by-id, delete-by-filter, delete-all for any registered table
//! - **Identifier allow-list**: table and column names are validated
//!   against a schema registry before they reach SQL text
//! - **Typed errors**: engine failures surface as [`StorageError`] variants
//! - **Catalog helpers**: typed producer and model records on top of the
//!   generic accessor

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod error;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{CommandError, Error, Result, StorageError};

// Re-export core domain types
pub use crate::core::{ColumnMap, Producer, Row, Value, VehicleModel};

// Re-export storage types
pub use storage::{
    Catalog, DEFAULT_DB_PATH, RowStore, SqliteStore, StoreConfig, StoreLocation, StoreStats,
};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
