//! CLI command implementations.
//!
//! Each command opens the store, makes sure the tables exist, and runs one
//! or more accessor operations.

use crate::cli::output::{
    DemoReport, OutputFormat, format_affected, format_demo, format_inserted, format_rows,
    format_status,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::{ColumnMap, Producer, Row, VehicleModel};
use crate::error::{CommandError, Result};
use crate::storage::{Catalog, MODEL_TABLE, PRODUCER_TABLE, RowStore, SqliteStore, TableSchema};
use tracing::debug;

/// Producers seeded by `demo`.
const DEMO_PRODUCERS: &[(&str, &str)] = &[
    ("Opel", "Niemcy"),
    ("Kia", "Korea Południowa"),
    ("Volkswagen", "Niemcy"),
    ("Toyota", "Japonia"),
];

/// Models seeded by `demo`, keyed by index into `DEMO_PRODUCERS`.
const DEMO_MODELS: &[(usize, &str, i64, &str)] = &[
    (0, "Astra F", 2000, "Sedan 1.4"),
    (1, "Rio", 2020, "1.2"),
    (2, "Passat B6", 2008, "1.9 TDI"),
    (3, "Aygo", 2010, "1.0"),
];

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let mut store = open_store(cli)?;

    match &cli.command {
        Commands::Init => Ok(cmd_init(&store, format)),
        Commands::Status => cmd_status(&store, format),
        Commands::AddProducer { name, country } => {
            cmd_add_producer(&mut store, name, country, format)
        }
        Commands::AddModel {
            producer_id,
            name,
            year,
            series,
        } => cmd_add_model(&mut store, *producer_id, name, *year, series, format),
        Commands::List { table } => cmd_list(&store, table, format),
        Commands::Select { table, filters } => cmd_select(&store, table, filters, format),
        Commands::Update {
            table,
            id,
            assignments,
        } => cmd_update(&mut store, table, *id, assignments, format),
        Commands::Delete { table, filters } => cmd_delete(&mut store, table, filters, format),
        Commands::Clear { table, yes } => cmd_clear(&mut store, table, *yes, format),
        Commands::Demo => cmd_demo(&mut store, format),
    }
}

/// Opens the configured store and creates any missing tables.
fn open_store(cli: &Cli) -> Result<SqliteStore> {
    let mut store = SqliteStore::connect(cli.store_config())?;
    store.init()?;
    Ok(store)
}

/// Parses `COLUMN=VALUE` arguments into an ordered column map.
///
/// Each value is typed by the target column's affinity, so text columns
/// keep literals like `007` verbatim.
///
/// # Errors
///
/// Returns [`CommandError::InvalidArgument`] if an argument has no `=` or
/// an empty column name, and [`StorageError::UnknownColumn`] for a column
/// outside the table.
///
/// [`StorageError::UnknownColumn`]: crate::error::StorageError::UnknownColumn
pub fn parse_column_values(table: &TableSchema, args: &[String]) -> Result<ColumnMap> {
    let mut map = ColumnMap::new();
    for arg in args {
        let (column, raw) = arg
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidArgument(format!("expected COLUMN=VALUE: {arg}")))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(CommandError::InvalidArgument(format!("missing column name: {arg}")).into());
        }
        let definition = table.find_column(column)?;
        map.set(column, definition.parse_literal(raw));
    }
    Ok(map)
}

/// Renders rows with the table's canonical column names.
fn render_rows(store: &SqliteStore, table: &str, rows: &[Row], format: OutputFormat) -> Result<String> {
    let schema = store.registry().table(table)?;
    let columns: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
    Ok(format_rows(&schema.name, &columns, rows, format))
}

// ==================== Command Implementations ====================

fn cmd_init(store: &SqliteStore, format: OutputFormat) -> String {
    let location = store
        .path()
        .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
    match format {
        OutputFormat::Text => format!("Initialized rowstore at {location}\n"),
        OutputFormat::Json => format!(
            "{}\n",
            serde_json::json!({ "initialized": true, "path": location })
        ),
    }
}

fn cmd_status(store: &SqliteStore, format: OutputFormat) -> Result<String> {
    let stats = store.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_add_producer(
    store: &mut SqliteStore,
    name: &str,
    country: &str,
    format: OutputFormat,
) -> Result<String> {
    let id = store.add_producer(&Producer::new(name, country))?;
    Ok(format_inserted(PRODUCER_TABLE, id, format))
}

fn cmd_add_model(
    store: &mut SqliteStore,
    producer_id: i64,
    name: &str,
    year: i64,
    series: &str,
    format: OutputFormat,
) -> Result<String> {
    let id = store.add_model(&VehicleModel::new(producer_id, name, year, series))?;
    Ok(format_inserted(MODEL_TABLE, id, format))
}

fn cmd_list(store: &SqliteStore, table: &str, format: OutputFormat) -> Result<String> {
    let rows = store.select_all(table)?;
    render_rows(store, table, &rows, format)
}

fn cmd_select(
    store: &SqliteStore,
    table: &str,
    filters: &[String],
    format: OutputFormat,
) -> Result<String> {
    let filters = parse_column_values(store.registry().table(table)?, filters)?;
    let rows = store.select_where(table, &filters)?;
    render_rows(store, table, &rows, format)
}

fn cmd_update(
    store: &mut SqliteStore,
    table: &str,
    id: i64,
    assignments: &[String],
    format: OutputFormat,
) -> Result<String> {
    let updates = parse_column_values(store.registry().table(table)?, assignments)?;
    let affected = store.update_by_id(table, id, &updates)?;
    Ok(format_affected("Updated", table, affected, format))
}

fn cmd_delete(
    store: &mut SqliteStore,
    table: &str,
    filters: &[String],
    format: OutputFormat,
) -> Result<String> {
    let filters = parse_column_values(store.registry().table(table)?, filters)?;
    let affected = store.delete_where(table, &filters)?;
    Ok(format_affected("Deleted", table, affected, format))
}

fn cmd_clear(
    store: &mut SqliteStore,
    table: &str,
    yes: bool,
    format: OutputFormat,
) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(format!(
            "refusing to clear {table} without --yes"
        ))
        .into());
    }
    let affected = store.delete_all(table)?;
    Ok(format_affected("Deleted", table, affected, format))
}

fn cmd_demo(store: &mut SqliteStore, format: OutputFormat) -> Result<String> {
    let producer_ids = DEMO_PRODUCERS
        .iter()
        .map(|(name, country)| store.add_producer(&Producer::new(*name, *country)))
        .collect::<Result<Vec<_>>>()?;

    let model_ids = DEMO_MODELS
        .iter()
        .map(|(producer, name, year, series)| {
            let producer_id = producer_ids[*producer];
            store.add_model(&VehicleModel::new(producer_id, *name, *year, *series))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(?producer_ids, ?model_ids, "demo rows seeded");

    let updated = match model_ids.last() {
        Some(&aygo) => {
            store.update_by_id(MODEL_TABLE, aygo, &ColumnMap::new().with("year", 2011))?
        }
        None => 0,
    };

    let year = 2008;
    let country = "Niemcy";
    let report = DemoReport {
        models: store.models_by_year(year)?,
        producers: store.producers_in(country)?,
        producer_ids,
        model_ids,
        updated,
        year,
        country: country.to_string(),
    };

    Ok(format_demo(&report, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::error::{Error, StorageError};
    use crate::storage::model_table;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_column_values() {
        let map =
            parse_column_values(&model_table(), &args(&["year=2011", "series=1.0 VVT-i"])).unwrap();
        assert_eq!(map.get("year"), Some(&Value::Integer(2011)));
        assert_eq!(
            map.get("series"),
            Some(&Value::Text("1.0 VVT-i".to_string()))
        );
    }

    #[test]
    fn test_parse_column_values_keeps_text_verbatim() {
        let map =
            parse_column_values(&model_table(), &args(&["name=007", "series=1.20"])).unwrap();
        assert_eq!(map.get("name"), Some(&Value::Text("007".to_string())));
        assert_eq!(map.get("series"), Some(&Value::Text("1.20".to_string())));
    }

    #[test]
    fn test_parse_column_values_keeps_equals_in_value() {
        let map = parse_column_values(&model_table(), &args(&["name=a=b"])).unwrap();
        assert_eq!(map.get("name"), Some(&Value::Text("a=b".to_string())));
    }

    #[test]
    fn test_parse_column_values_rejects_malformed() {
        let table = model_table();
        let err = parse_column_values(&table, &args(&["year"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Command(CommandError::InvalidArgument(_))
        ));
        assert!(parse_column_values(&table, &args(&["=2011"])).is_err());

        let err = parse_column_values(&table, &args(&["colour=red"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::UnknownColumn { .. })
        ));
    }
}
