//! Table definitions and the identifier allow-list.
//!
//! Table and column names cannot be bound as parameters, so every name that
//! reaches SQL text must first resolve through a [`SchemaRegistry`].

use crate::core::Value;
use crate::error::{Error, StorageError};
use std::fmt::Write;

/// Producer table name.
pub const PRODUCER_TABLE: &str = "Marka";

/// Model table name.
pub const MODEL_TABLE: &str = "Model";

/// How a column participates in the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKey {
    /// Ordinary column.
    No,
    /// `INTEGER PRIMARY KEY`: rowid alias, reuses the highest id + 1.
    Rowid,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`: ids are never reused.
    AutoIncrement,
}

/// Type affinity derived from a declared column type.
///
/// Follows SQLite's rules: the first matching substring wins, checked in
/// the order `INT`, `CHAR`/`CLOB`/`TEXT`, `BLOB` (or no type), and
/// `REAL`/`FLOA`/`DOUB`. Anything else is numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// Integer affinity.
    Integer,
    /// Text affinity.
    Text,
    /// No conversion (`BLOB` or an empty type).
    Blob,
    /// Floating-point affinity.
    Real,
    /// Numeric affinity.
    Numeric,
}

impl Affinity {
    /// Determines the affinity of a declared type such as `text(20)`.
    #[must_use]
    pub fn of(sql_type: &str) -> Self {
        let declared = sql_type.to_ascii_uppercase();
        let has = |needle: &str| declared.contains(needle);
        if has("INT") {
            Self::Integer
        } else if has("CHAR") || has("CLOB") || has("TEXT") {
            Self::Text
        } else if has("BLOB") || declared.trim().is_empty() {
            Self::Blob
        } else if has("REAL") || has("FLOA") || has("DOUB") {
            Self::Real
        } else {
            Self::Numeric
        }
    }
}

/// A single column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared SQL type, e.g. `text(20)` or `int`.
    pub sql_type: String,
    /// Primary key role.
    pub primary_key: PrimaryKey,
    /// Whether the column is `NOT NULL`.
    pub not_null: bool,
}

impl ColumnDef {
    /// Creates a nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            primary_key: PrimaryKey::No,
            not_null: false,
        }
    }

    /// Creates an `INTEGER PRIMARY KEY NOT NULL` column.
    #[must_use]
    pub fn rowid(name: impl Into<String>, primary_key: PrimaryKey) -> Self {
        Self {
            name: name.into(),
            sql_type: "INTEGER".to_string(),
            primary_key,
            not_null: true,
        }
    }

    /// Type affinity of the declared type.
    #[must_use]
    pub fn affinity(&self) -> Affinity {
        Affinity::of(&self.sql_type)
    }

    /// Types a command-line literal for this column.
    ///
    /// Numbers are only recognized for numeric affinities; text and untyped
    /// columns keep the literal as written.
    #[must_use]
    pub fn parse_literal(&self, raw: &str) -> Value {
        match self.affinity() {
            Affinity::Integer | Affinity::Real | Affinity::Numeric => Value::parse_literal(raw),
            Affinity::Text | Affinity::Blob => Value::parse_text_literal(raw),
        }
    }

    /// Returns true if the store assigns this column's value on insert.
    #[must_use]
    pub const fn is_auto_assigned(&self) -> bool {
        !matches!(self.primary_key, PrimaryKey::No)
    }
}

/// A `FOREIGN KEY (column) REFERENCES table(foreign_column)` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referencing column in this table.
    pub column: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced column.
    pub foreign_column: String,
}

/// A table definition: ordered columns plus foreign keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in declaration order (this is also `SELECT *` order).
    pub columns: Vec<ColumnDef>,
    /// Foreign key clauses.
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    /// Creates an empty table definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a foreign key clause.
    #[must_use]
    pub fn foreign_key(
        mut self,
        column: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.into(),
            foreign_table: foreign_table.into(),
            foreign_column: foreign_column.into(),
        });
        self
    }

    /// Resolves a column name (ASCII case-insensitive).
    pub fn find_column(&self, name: &str) -> Result<&ColumnDef, StorageError> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StorageError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// The primary key column, if one is declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.is_auto_assigned())
    }

    /// Columns supplied by the caller on insert, in declaration order.
    pub fn insert_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.is_auto_assigned())
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` DDL for this table.
    #[must_use]
    pub fn create_sql(&self) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut line = format!("{} {}", quote_identifier(&c.name), c.sql_type);
                match c.primary_key {
                    PrimaryKey::No => {}
                    PrimaryKey::Rowid => line.push_str(" PRIMARY KEY"),
                    PrimaryKey::AutoIncrement => line.push_str(" PRIMARY KEY AUTOINCREMENT"),
                }
                if c.not_null {
                    line.push_str(" NOT NULL");
                }
                line
            })
            .collect();

        for fk in &self.foreign_keys {
            lines.push(format!(
                "FOREIGN KEY({}) REFERENCES {}({})",
                quote_identifier(&fk.column),
                quote_identifier(&fk.foreign_table),
                quote_identifier(&fk.foreign_column)
            ));
        }

        let mut sql = String::new();
        let _ = writeln!(
            sql,
            "CREATE TABLE IF NOT EXISTS {} (",
            quote_identifier(&self.name)
        );
        sql.push_str("    ");
        sql.push_str(&lines.join(",\n    "));
        sql.push_str("\n)");
        sql
    }

    fn validate(&self) -> Result<(), String> {
        if !is_plain_identifier(&self.name) {
            return Err(format!("invalid table name: {:?}", self.name));
        }
        if self.columns.is_empty() {
            return Err(format!("table {} has no columns", self.name));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if !is_plain_identifier(&column.name) {
                return Err(format!("invalid column name: {}.{:?}", self.name, column.name));
            }
            if self.columns[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&column.name))
            {
                return Err(format!("duplicate column: {}.{}", self.name, column.name));
            }
        }
        if self.columns.iter().filter(|c| c.is_auto_assigned()).count() > 1 {
            return Err(format!("table {} declares more than one primary key", self.name));
        }
        for fk in &self.foreign_keys {
            if self.find_column(&fk.column).is_err() {
                return Err(format!(
                    "foreign key on unknown column: {}.{}",
                    self.name, fk.column
                ));
            }
        }
        Ok(())
    }
}

/// The set of tables a store may touch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
}

impl SchemaRegistry {
    /// Builds a registry, rejecting malformed or duplicate definitions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a name is not a plain identifier, a
    /// table is declared twice, or a foreign key names an unknown column.
    pub fn new(tables: Vec<TableSchema>) -> Result<Self, Error> {
        for (i, table) in tables.iter().enumerate() {
            table.validate().map_err(|message| Error::Config { message })?;
            if tables[..i]
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case(&table.name))
            {
                return Err(Error::Config {
                    message: format!("duplicate table: {}", table.name),
                });
            }
        }
        Ok(Self { tables })
    }

    /// Resolves a table name (ASCII case-insensitive).
    pub fn table(&self, name: &str) -> Result<&TableSchema, StorageError> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StorageError::UnknownTable {
                table: name.to_string(),
            })
    }

    /// All registered tables in declaration order.
    #[must_use]
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }
}

/// The producer table: `id`, `name`, `country`.
#[must_use]
pub fn producer_table() -> TableSchema {
    TableSchema::new(PRODUCER_TABLE)
        .column(ColumnDef::rowid("id", PrimaryKey::Rowid))
        .column(ColumnDef::new("name", "text(20)"))
        .column(ColumnDef::new("country", "text(25)"))
}

/// The model table: `id`, `producer_id`, `name`, `year`, `series`.
#[must_use]
pub fn model_table() -> TableSchema {
    TableSchema::new(MODEL_TABLE)
        .column(ColumnDef::rowid("id", PrimaryKey::AutoIncrement))
        .column(ColumnDef::new("producer_id", "int"))
        .column(ColumnDef::new("name", "text(25)"))
        .column(ColumnDef::new("year", "int"))
        .column(ColumnDef::new("series", "text(20)"))
        .foreign_key("producer_id", PRODUCER_TABLE, "id")
}

/// Wraps an identifier in double quotes, doubling embedded quotes.
#[must_use]
pub fn quote_identifier(identifier: &str) -> String {
    let escaped = identifier.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
