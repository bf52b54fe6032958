//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Groundwork
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a query, returning every cell as text.
    ///
    /// Cells are `None` for SQL NULL. Non-text columns must be cast to
    /// VARCHAR in the query itself; the ledger queries do this so row
    /// extraction does not depend on driver type mapping.
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<Option<String>>>>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Begin a transaction.
    ///
    /// The runner wraps each migration and its ledger write in one
    /// transaction, so the trait carries the BEGIN/COMMIT/ROLLBACK
    /// discipline rather than leaving it to ad hoc SQL at call sites.
    async fn begin(&self) -> DbResult<()> {
        self.execute_batch("BEGIN TRANSACTION").await
    }

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()> {
        self.execute_batch("COMMIT").await
    }

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch("ROLLBACK").await
    }

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
