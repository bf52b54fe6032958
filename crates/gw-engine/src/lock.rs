//! Single-writer batch lock.
//!
//! DuckDB has no advisory lock primitive, so the lock is a single-row table:
//! whoever inserts the row holds the lock, and releasing deletes it again.
//! Contention surfaces as a primary-key violation, which the acquirer polls
//! on with a bounded timeout.

use crate::error::{EngineError, EngineResult};
use gw_core::sql_utils::quote_qualified;
use gw_db::Database;
use std::time::{Duration, Instant};

/// Id of the single lock row.
const LOCK_ID: i32 = 1;

/// Sleep between acquisition attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Advisory lock serializing migration batches.
pub struct BatchLock {
    table: String,
    timeout: Duration,
}

impl BatchLock {
    pub fn new(table: impl Into<String>, timeout: Duration) -> Self {
        Self {
            table: table.into(),
            timeout,
        }
    }

    /// Create the lock table when missing.
    pub async fn ensure_table(&self, db: &dyn Database) -> EngineResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                 id INTEGER PRIMARY KEY, \
                 locked_at TIMESTAMP NOT NULL DEFAULT now()\
             )",
            quote_qualified(&self.table)
        );
        db.execute_batch(&sql).await?;
        Ok(())
    }

    /// Acquire the lock, waiting up to the configured timeout.
    ///
    /// Only a constraint violation (someone else holds the row) is retried;
    /// any other error aborts immediately.
    pub async fn acquire(&self, db: &dyn Database) -> EngineResult<()> {
        self.ensure_table(db).await?;

        let sql = format!(
            "INSERT INTO {} (id) VALUES ({})",
            quote_qualified(&self.table),
            LOCK_ID
        );
        let started = Instant::now();
        loop {
            match db.execute(&sql).await {
                Ok(_) => {
                    log::debug!("Migration lock acquired");
                    return Ok(());
                }
                Err(e) if e.is_constraint_violation() => {
                    if started.elapsed() >= self.timeout {
                        return Err(EngineError::LockTimeout {
                            waited_ms: started.elapsed().as_millis() as u64,
                        });
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Release the lock.
    ///
    /// Failures are logged rather than returned: by the time we release, the
    /// batch outcome is already decided and must reach the caller.
    pub async fn release(&self, db: &dyn Database) {
        let sql = format!(
            "DELETE FROM {} WHERE id = {}",
            quote_qualified(&self.table),
            LOCK_ID
        );
        match db.execute(&sql).await {
            Ok(_) => log::debug!("Migration lock released"),
            Err(e) => log::warn!("Failed to release migration lock: {e}"),
        }
    }
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod tests;
