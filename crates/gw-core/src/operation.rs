//! Declarative schema operations and their SQL rendering.
//!
//! Migration files describe schema changes as data rather than raw SQL, which
//! is what makes automatic inversion possible: a `create_table` knows its own
//! `drop_table`, a `rename_column` knows how to rename back. The `sql` escape
//! hatch exists for anything the vocabulary cannot express, at the cost of
//! having no derivable inverse.

use crate::serde_helpers::default_true;
use crate::sql_utils::{escape_sql_string, quote_ident, quote_qualified};
use serde::{Deserialize, Serialize};

/// Column type vocabulary for migration files.
///
/// Types are logical names mapped to DuckDB SQL types at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Variable-length string (VARCHAR)
    String,
    /// Long-form text (TEXT)
    Text,
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Bigint,
    /// Double-precision float
    Float,
    /// Exact decimal
    Decimal,
    /// Boolean
    Boolean,
    /// Date and time without time zone (TIMESTAMP)
    Datetime,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// UUID
    Uuid,
    /// JSON document
    Json,
}

impl ColumnType {
    /// The DuckDB SQL type this logical type renders to.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::String => "VARCHAR",
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Bigint => "BIGINT",
            ColumnType::Float => "DOUBLE",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Datetime => "TIMESTAMP",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::Uuid => "UUID",
            ColumnType::Json => "JSON",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_type())
    }
}

/// A column default value from a migration file.
///
/// Untagged so YAML scalars map naturally: `default: true`, `default: 0`,
/// `default: draft`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Boolean default
    Bool(bool),
    /// Integer default
    Int(i64),
    /// Floating-point default
    Float(f64),
    /// String default
    Text(String),
}

impl DefaultValue {
    /// Render the default as a SQL literal.
    pub fn to_sql(&self) -> String {
        match self {
            DefaultValue::Bool(true) => "TRUE".to_string(),
            DefaultValue::Bool(false) => "FALSE".to_string(),
            DefaultValue::Int(v) => v.to_string(),
            DefaultValue::Float(v) => v.to_string(),
            DefaultValue::Text(v) => format!("'{}'", escape_sql_string(v)),
        }
    }
}

/// A column definition inside `create_table` or `add_column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Logical column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether NULL values are allowed (default: true)
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Default value, rendered as a SQL literal
    #[serde(default)]
    pub default: Option<DefaultValue>,

    /// Whether this column is the table's primary key
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnDef {
    /// Render the column as a fragment of a CREATE TABLE or ADD COLUMN
    /// statement.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(&self.name), self.column_type.sql_type());
        if self.primary_key {
            // PRIMARY KEY already implies NOT NULL
            sql.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql());
        }
        sql
    }
}

/// A single declarative schema change.
///
/// Each operation renders to exactly one SQL statement. Operations that
/// destroy information (`drop_table`, `drop_column`, `drop_index`, raw `sql`)
/// have no derivable inverse; everything else does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum SchemaOperation {
    /// Create a table with the given columns
    CreateTable {
        name: String,
        #[serde(default)]
        columns: Vec<ColumnDef>,
        /// Add `created_at` and `updated_at` TIMESTAMP NOT NULL columns
        #[serde(default)]
        timestamps: bool,
    },
    /// Drop a table
    DropTable { name: String },
    /// Add a column to an existing table
    AddColumn { table: String, column: ColumnDef },
    /// Drop a column from a table
    DropColumn { table: String, name: String },
    /// Rename a column
    RenameColumn {
        table: String,
        from: String,
        to: String,
    },
    /// Rename a table
    RenameTable { from: String, to: String },
    /// Create an index over one or more columns
    CreateIndex {
        table: String,
        columns: Vec<String>,
        /// Index name; defaults to `idx_<table>_<columns>`
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        unique: bool,
    },
    /// Drop an index by name
    DropIndex { name: String },
    /// Raw SQL escape hatch; never invertible
    Sql(String),
}

impl SchemaOperation {
    /// Render the operation as a single SQL statement (no trailing
    /// semicolon).
    pub fn to_sql(&self) -> String {
        match self {
            SchemaOperation::CreateTable {
                name,
                columns,
                timestamps,
            } => {
                let mut cols: Vec<String> = columns.iter().map(ColumnDef::to_sql).collect();
                if *timestamps {
                    cols.push(format!("{} TIMESTAMP NOT NULL", quote_ident("created_at")));
                    cols.push(format!("{} TIMESTAMP NOT NULL", quote_ident("updated_at")));
                }
                format!("CREATE TABLE {} ({})", quote_qualified(name), cols.join(", "))
            }
            SchemaOperation::DropTable { name } => {
                format!("DROP TABLE {}", quote_qualified(name))
            }
            SchemaOperation::AddColumn { table, column } => {
                format!(
                    "ALTER TABLE {} ADD COLUMN {}",
                    quote_qualified(table),
                    column.to_sql()
                )
            }
            SchemaOperation::DropColumn { table, name } => {
                format!(
                    "ALTER TABLE {} DROP COLUMN {}",
                    quote_qualified(table),
                    quote_ident(name)
                )
            }
            SchemaOperation::RenameColumn { table, from, to } => {
                format!(
                    "ALTER TABLE {} RENAME COLUMN {} TO {}",
                    quote_qualified(table),
                    quote_ident(from),
                    quote_ident(to)
                )
            }
            SchemaOperation::RenameTable { from, to } => {
                format!(
                    "ALTER TABLE {} RENAME TO {}",
                    quote_qualified(from),
                    quote_ident(to)
                )
            }
            SchemaOperation::CreateIndex {
                table,
                columns,
                name,
                unique,
            } => {
                let index = name
                    .clone()
                    .unwrap_or_else(|| default_index_name(table, columns));
                let cols = columns
                    .iter()
                    .map(|c| quote_ident(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                let keyword = if *unique { "UNIQUE INDEX" } else { "INDEX" };
                format!(
                    "CREATE {} {} ON {} ({})",
                    keyword,
                    quote_ident(&index),
                    quote_qualified(table),
                    cols
                )
            }
            SchemaOperation::DropIndex { name } => {
                format!("DROP INDEX {}", quote_ident(name))
            }
            SchemaOperation::Sql(sql) => sql.clone(),
        }
    }

    /// Derive the inverse operation, if one exists.
    ///
    /// Returns `None` for operations that destroy information: the dropped
    /// table or column cannot be reconstructed from the operation alone.
    pub fn invert(&self) -> Option<SchemaOperation> {
        match self {
            SchemaOperation::CreateTable { name, .. } => Some(SchemaOperation::DropTable {
                name: name.clone(),
            }),
            SchemaOperation::DropTable { .. } => None,
            SchemaOperation::AddColumn { table, column } => Some(SchemaOperation::DropColumn {
                table: table.clone(),
                name: column.name.clone(),
            }),
            SchemaOperation::DropColumn { .. } => None,
            SchemaOperation::RenameColumn { table, from, to } => {
                Some(SchemaOperation::RenameColumn {
                    table: table.clone(),
                    from: to.clone(),
                    to: from.clone(),
                })
            }
            SchemaOperation::RenameTable { from, to } => Some(SchemaOperation::RenameTable {
                from: to.clone(),
                to: from.clone(),
            }),
            SchemaOperation::CreateIndex {
                table,
                columns,
                name,
                ..
            } => Some(SchemaOperation::DropIndex {
                name: name
                    .clone()
                    .unwrap_or_else(|| default_index_name(table, columns)),
            }),
            SchemaOperation::DropIndex { .. } => None,
            SchemaOperation::Sql(_) => None,
        }
    }

    /// Check structural constraints that serde cannot express.
    ///
    /// Returns a human-readable message on failure; callers attach the file
    /// path.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SchemaOperation::CreateTable {
                name,
                columns,
                timestamps,
            } => {
                if columns.is_empty() && !timestamps {
                    return Err(format!("create_table '{name}' defines no columns"));
                }
                let mut seen = std::collections::HashSet::new();
                for col in columns {
                    if !seen.insert(col.name.as_str()) {
                        return Err(format!(
                            "create_table '{}' defines column '{}' twice",
                            name, col.name
                        ));
                    }
                }
                Ok(())
            }
            SchemaOperation::CreateIndex { table, columns, .. } => {
                if columns.is_empty() {
                    return Err(format!("create_index on '{table}' lists no columns"));
                }
                Ok(())
            }
            SchemaOperation::Sql(sql) => {
                if sql.trim().is_empty() {
                    return Err("sql operation is empty".to_string());
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Default index name when `create_index` does not specify one.
fn default_index_name(table: &str, columns: &[String]) -> String {
    // Qualified table names keep only the table part
    let table = table.rsplit('.').next().unwrap_or(table);
    format!("idx_{}_{}", table, columns.join("_"))
}

#[cfg(test)]
#[path = "operation_test.rs"]
mod tests;
