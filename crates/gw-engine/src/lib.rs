//! Migration execution engine for Groundwork.
//!
//! Resolves migration definitions against the applied-migrations ledger and
//! executes the pending set in identity order, one transaction per
//! migration, under an advisory batch lock. Rollback reverts applied
//! migrations newest first using explicit `down` sections or inverses
//! derived from `up`.

pub mod error;
pub mod ledger;
pub mod lock;
pub mod runner;

pub use error::{EngineError, EngineResult};
pub use ledger::Ledger;
pub use lock::BatchLock;
pub use runner::{ApplyReport, ExecutedMigration, FailedMigration, RollbackReport, Runner};
