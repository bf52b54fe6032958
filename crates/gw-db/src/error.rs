//! Error types for gw-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Constraint violation (D004)
    #[error("[D004] Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D006)
    #[error("[D006] Internal database error: {0}")]
    Internal(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // Classify DuckDB errors by inspecting the error message.
        // duckdb::Error does not expose structured variants, so string
        // matching is the only reliable approach. We use narrow patterns
        // to avoid misclassifying unrelated errors.
        let msg = err.to_string();
        if msg.contains("Constraint Error")
            || msg.contains("constraint violated")
            || msg.contains("violates primary key")
            || msg.contains("violates unique constraint")
        {
            DbError::ConstraintViolation(msg)
        } else if msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

impl DbError {
    /// Whether this error means another writer currently holds a row we
    /// tried to insert. The batch lock retries only on this.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }
}
