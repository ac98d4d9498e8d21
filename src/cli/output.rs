//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{Producer, Row, VehicleModel};
use crate::error::Error;
use crate::storage::StoreStats;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StoreStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StoreStats) -> String {
    let mut output = String::new();
    output.push_str("rowstore status\n");
    output.push_str("===============\n\n");
    let _ = writeln!(
        output,
        "  Database:      {}",
        stats.path.as_deref().unwrap_or(":memory:")
    );
    let _ = writeln!(output, "  SQLite:        {}", stats.sqlite_version);
    let _ = writeln!(
        output,
        "  Foreign keys:  {}",
        if stats.foreign_keys { "enforced" } else { "off" }
    );
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {size} bytes");
    }
    output.push('\n');
    for table in &stats.tables {
        let _ = writeln!(output, "  {:<14} {} rows", format!("{}:", table.name), table.rows);
    }
    output
}

/// Formats query results for a table.
///
/// `columns` are the table's column names in declaration order.
#[must_use]
pub fn format_rows(table: &str, columns: &[&str], rows: &[Row], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_rows_text(table, columns, rows),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct RowsOutput<'a> {
                table: &'a str,
                columns: &'a [&'a str],
                rows: &'a [Row],
            }
            format_json(&RowsOutput {
                table,
                columns,
                rows,
            })
        }
    }
}

fn format_rows_text(table: &str, columns: &[&str], rows: &[Row]) -> String {
    if rows.is_empty() {
        return format!("No rows found in {table}.\n");
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.values().iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut output = String::new();
    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| pad(c, widths[i]))
        .collect();
    let _ = writeln!(output, "{}", header.join("  ").trim_end());
    output.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    output.push('\n');

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i]))
            .collect();
        let _ = writeln!(output, "{}", line.join("  ").trim_end());
    }

    let _ = writeln!(output, "\n{} row(s)", rows.len());
    output
}

/// Formats the id of a newly inserted row.
#[must_use]
pub fn format_inserted(table: &str, id: i64, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("Inserted {table} row {id}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Inserted<'a> {
                table: &'a str,
                id: i64,
            }
            format_json(&Inserted { table, id })
        }
    }
}

/// Formats the outcome of an update or delete.
#[must_use]
pub fn format_affected(action: &str, table: &str, affected: usize, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{action} {affected} row(s) in {table}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Affected<'a> {
                action: &'a str,
                table: &'a str,
                affected: usize,
            }
            format_json(&Affected {
                action,
                table,
                affected,
            })
        }
    }
}

/// Results of the `demo` command.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    /// Ids assigned to the seeded producers.
    pub producer_ids: Vec<i64>,
    /// Ids assigned to the seeded models.
    pub model_ids: Vec<i64>,
    /// Rows changed by the year update.
    pub updated: usize,
    /// Year used for the model query.
    pub year: i64,
    /// Models from `year`.
    pub models: Vec<VehicleModel>,
    /// Country used for the producer query.
    pub country: String,
    /// Producers from `country`.
    pub producers: Vec<Producer>,
}

/// Formats the demo report.
#[must_use]
pub fn format_demo(report: &DemoReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(report),
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Seeded {} producers and {} models; updated {} row(s).",
                report.producer_ids.len(),
                report.model_ids.len(),
                report.updated
            );
            let _ = writeln!(output, "\nModels from {}:", report.year);
            for m in &report.models {
                let _ = writeln!(
                    output,
                    "  ({}, {}, {}, {}, {})",
                    m.id.unwrap_or(0),
                    sql_literal(m.producer_id.as_ref()),
                    quoted_literal(m.name.as_deref()),
                    sql_literal(m.year.as_ref()),
                    quoted_literal(m.series.as_deref())
                );
            }
            let _ = writeln!(output, "\nProducers from {}:", report.country);
            for p in &report.producers {
                let _ = writeln!(
                    output,
                    "  ({}, {}, {})",
                    p.id.unwrap_or(0),
                    quoted_literal(p.name.as_deref()),
                    quoted_literal(p.country.as_deref())
                );
            }
            output
        }
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}

/// Renders a nullable value the way it would appear in a SQL tuple.
fn sql_literal<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "NULL".to_string(), ToString::to_string)
}

/// Like [`sql_literal`], single-quoting text.
fn quoted_literal(value: Option<&str>) -> String {
    value.map_or_else(|| "NULL".to_string(), |v| format!("'{v}'"))
}

/// Left-aligns `s` in a field of `width` characters.
fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}
