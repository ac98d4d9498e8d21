//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::storage::{StoreConfig, StoreLocation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rowstore: generic row access over a `SQLite` producer/model catalog.
#[derive(Parser, Debug)]
#[command(name = "rowstore")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file.
    ///
    /// Defaults to `rowstore.db` in the current directory.
    #[arg(short, long, env = "ROWSTORE_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Use a throwaway in-memory database (overrides `--db-path`).
    #[arg(long, global = true)]
    pub memory: bool,

    /// Enforce the Model -> Marka foreign key.
    #[arg(long, env = "ROWSTORE_FOREIGN_KEYS", global = true)]
    pub foreign_keys: bool,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database file and tables if they don't exist.
    Init,

    /// Show row counts and database details.
    Status,

    /// Add a producer (Marka row).
    AddProducer {
        /// Brand name.
        name: String,

        /// Country of production.
        country: String,
    },

    /// Add a model (Model row).
    AddModel {
        /// Id of the owning producer.
        producer_id: i64,

        /// Model name.
        name: String,

        /// Production year.
        year: i64,

        /// Series or engine variant.
        series: String,
    },

    /// List every row in a table.
    #[command(alias = "ls")]
    List {
        /// Table name.
        table: String,
    },

    /// Select rows matching all COLUMN=VALUE filters.
    Select {
        /// Table name.
        table: String,

        /// Filters as COLUMN=VALUE.
        #[arg(required = true)]
        filters: Vec<String>,
    },

    /// Set COLUMN=VALUE pairs on the row with the given id.
    Update {
        /// Table name.
        table: String,

        /// Row id.
        id: i64,

        /// Assignments as COLUMN=VALUE.
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Delete rows matching all COLUMN=VALUE filters.
    #[command(alias = "rm")]
    Delete {
        /// Table name.
        table: String,

        /// Filters as COLUMN=VALUE.
        #[arg(required = true)]
        filters: Vec<String>,
    },

    /// Delete every row in a table.
    Clear {
        /// Table name.
        table: String,

        /// Confirm the deletion.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Seed sample producers and models, then run a few queries.
    Demo,
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }

    /// Builds the store configuration from the parsed arguments.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        let location = if self.memory {
            StoreLocation::Memory
        } else {
            StoreLocation::File(self.get_db_path())
        };
        StoreConfig::catalog(location).with_foreign_keys(self.foreign_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(db_path: Option<PathBuf>, memory: bool) -> Cli {
        Cli {
            db_path,
            memory,
            foreign_keys: false,
            verbose: false,
            format: "text".to_string(),
            command: Commands::Status,
        }
    }

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_db_path() {
        assert_eq!(
            cli(None, false).get_db_path(),
            PathBuf::from(crate::storage::DEFAULT_DB_PATH)
        );
    }

    #[test]
    fn test_memory_config() {
        let config = cli(None, true).store_config();
        assert_eq!(config.location, StoreLocation::Memory);
        assert_eq!(config.tables.len(), 2);
    }

    #[test]
    fn test_file_config() {
        let config = cli(Some(PathBuf::from("/tmp/cars.db")), false).store_config();
        assert_eq!(
            config.location,
            StoreLocation::File(PathBuf::from("/tmp/cars.db"))
        );
    }

    #[test]
    fn test_parse_select_filters() {
        let parsed = Cli::try_parse_from([
            "rowstore",
            "select",
            "Model",
            "year=2008",
            "series=1.9 TDI",
        ])
        .unwrap();
        match parsed.command {
            Commands::Select { table, filters } => {
                assert_eq!(table, "Model");
                assert_eq!(filters, ["year=2008", "series=1.9 TDI"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_select_requires_filter() {
        assert!(Cli::try_parse_from(["rowstore", "select", "Model"]).is_err());
    }
}
