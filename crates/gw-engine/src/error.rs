//! Error types for the execution engine.

use gw_db::DbError;
use thiserror::Error;

/// Engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A migration failed to apply or revert (M001).
    #[error("[M001] Migration {identity}_{name} failed: {message}")]
    MigrationFailed {
        identity: String,
        name: String,
        message: String,
    },

    /// Rollback requested for a migration with no usable inverse (M002).
    #[error("[M002] Migration {identity}_{name} cannot be rolled back: {reason}")]
    NoInverseDefined {
        identity: String,
        name: String,
        reason: String,
    },

    /// An applied ledger entry has no migration file on disk (M003).
    #[error("[M003] No migration file found for applied migration {identity}")]
    DefinitionNotFound { identity: String },

    /// Rollback target is not recorded as applied (M004).
    #[error("[M004] Migration {identity} is not applied")]
    NotApplied { identity: String },

    /// Could not acquire the batch lock in time (M005).
    #[error("[M005] Could not acquire migration lock after {waited_ms}ms; is another batch running?")]
    LockTimeout { waited_ms: u64 },

    /// Ledger table contents are unreadable (M006).
    #[error("[M006] Ledger corrupt: {message}")]
    LedgerCorrupt { message: String },

    /// Database error, passed through with its own code.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
