//! The applied-migrations ledger.
//!
//! One row per applied migration: identity, name, applied_at, checksum.
//! Every statement goes through the [`Database`] trait so ledger writes can
//! share the runner's per-migration transaction.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use gw_core::plan::LedgerEntry;
use gw_core::sql_utils::{escape_sql_string, quote_qualified};
use gw_core::{MigrationFile, MigrationId};
use gw_db::Database;

/// Timestamp format for ledger writes.
const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Timestamp format for reads. DuckDB's VARCHAR cast omits an all-zero
/// fraction, and `%.f` accepts both forms.
const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Accessor for the applied-migrations table.
pub struct Ledger {
    table: String,
}

impl Ledger {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// The ledger table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table when missing.
    pub async fn ensure_table(&self, db: &dyn Database) -> EngineResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                 identity VARCHAR PRIMARY KEY, \
                 name VARCHAR NOT NULL, \
                 applied_at TIMESTAMP NOT NULL DEFAULT now(), \
                 checksum VARCHAR NOT NULL\
             )",
            quote_qualified(&self.table)
        );
        db.execute_batch(&sql).await?;
        Ok(())
    }

    /// Read every ledger entry, sorted by identity.
    ///
    /// Identities are stored as text but ordered numerically here: an SQL
    /// ORDER BY on the VARCHAR column would put '10' before '2'.
    pub async fn entries(&self, db: &dyn Database) -> EngineResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT identity, name, CAST(applied_at AS VARCHAR), checksum FROM {}",
            quote_qualified(&self.table)
        );
        let rows = db.query_rows(&sql).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(parse_entry(&row)?);
        }
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    /// Record a migration as applied. Runs inside the caller's transaction.
    pub async fn record(
        &self,
        db: &dyn Database,
        migration: &MigrationFile,
        applied_at: DateTime<Utc>,
    ) -> EngineResult<()> {
        let sql = format!(
            "INSERT INTO {} (identity, name, applied_at, checksum) \
             VALUES ('{}', '{}', '{}', '{}')",
            quote_qualified(&self.table),
            migration.id,
            escape_sql_string(&migration.name),
            applied_at.format(TIMESTAMP_WRITE_FORMAT),
            escape_sql_string(&migration.checksum),
        );
        db.execute(&sql).await?;
        Ok(())
    }

    /// Delete a migration's ledger row. Runs inside the caller's transaction.
    pub async fn remove(&self, db: &dyn Database, id: MigrationId) -> EngineResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE identity = '{}'",
            quote_qualified(&self.table),
            id,
        );
        db.execute(&sql).await?;
        Ok(())
    }
}

/// Parse one ledger row. Any unreadable cell is [`EngineError::LedgerCorrupt`]:
/// the ledger is the source of truth, so guessing is worse than halting.
fn parse_entry(row: &[Option<String>]) -> EngineResult<LedgerEntry> {
    let cell = |i: usize| -> EngineResult<&str> {
        row.get(i)
            .and_then(|c| c.as_deref())
            .ok_or_else(|| EngineError::LedgerCorrupt {
                message: format!("row has no value in column {i}: {row:?}"),
            })
    };

    let id = MigrationId::parse(cell(0)?).map_err(|e| EngineError::LedgerCorrupt {
        message: format!("bad identity: {e}"),
    })?;
    let name = cell(1)?.to_string();
    let applied_at = NaiveDateTime::parse_from_str(cell(2)?, TIMESTAMP_READ_FORMAT)
        .map_err(|e| EngineError::LedgerCorrupt {
            message: format!("bad applied_at for migration {id}: {e}"),
        })?
        .and_utc();
    let checksum = cell(3)?.to_string();

    Ok(LedgerEntry {
        id,
        name,
        applied_at,
        checksum,
    })
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
