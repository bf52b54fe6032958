//! Migration runner: plan, apply, roll back.
//!
//! The runner owns batch execution order and the contiguous-prefix
//! guarantee: migrations apply one at a time in identity order, each inside
//! its own transaction together with its ledger write. A failure stops the
//! batch, so the ledger always describes an intact prefix of the pending
//! set. Both directions run under the batch lock.

use crate::error::{EngineError, EngineResult};
use crate::ledger::Ledger;
use crate::lock::BatchLock;
use chrono::Utc;
use gw_core::plan::{ChecksumDrift, LedgerEntry, MigrationPlan};
use gw_core::{MigrationFile, MigrationId, SchemaOperation};
use gw_db::Database;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A migration the runner executed, in either direction.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedMigration {
    pub id: MigrationId,
    pub name: String,
    pub duration_secs: f64,
}

/// A migration that stopped the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FailedMigration {
    pub id: MigrationId,
    pub name: String,
    pub error: String,
}

/// Outcome of `apply_all`.
///
/// A failed migration is part of the report, not an `Err`: the applied
/// prefix is real, committed work that the caller still needs to see.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// Migrations applied this batch, in order
    pub applied: Vec<ExecutedMigration>,

    /// The migration that stopped the batch, if any
    pub failed: Option<FailedMigration>,

    /// Pending migrations never attempted because of a failure or a cancel
    pub skipped: usize,

    /// Whether the batch stopped on a cancellation request
    pub cancelled: bool,

    /// Ledger entries with no file on disk (warnings)
    pub orphaned: Vec<LedgerEntry>,

    /// Applied migrations whose files changed since they ran (warnings)
    pub drifted: Vec<ChecksumDrift>,
}

/// Outcome of `rollback`.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackReport {
    /// Migrations reverted this batch, newest first
    pub rolled_back: Vec<ExecutedMigration>,

    /// The migration that stopped the batch, if any
    pub failed: Option<FailedMigration>,

    /// Migrations never attempted because of a failure or a cancel
    pub skipped: usize,

    /// Whether the batch stopped on a cancellation request
    pub cancelled: bool,
}

/// Migration runner bound to one database connection.
pub struct Runner<'a> {
    db: &'a dyn Database,
    ledger: Ledger,
    lock: BatchLock,
}

impl<'a> Runner<'a> {
    pub fn new(
        db: &'a dyn Database,
        ledger_table: &str,
        lock_table: &str,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            db,
            ledger: Ledger::new(ledger_table),
            lock: BatchLock::new(lock_table, lock_timeout),
        }
    }

    /// Resolve definitions against the ledger without mutating anything.
    ///
    /// A missing ledger table reads as an empty ledger, so `status` works on
    /// a database no migration has ever touched.
    pub async fn plan(&self, definitions: &[MigrationFile]) -> EngineResult<MigrationPlan> {
        let entries = if self.db.relation_exists(self.ledger.table()).await? {
            self.ledger.entries(self.db).await?
        } else {
            Vec::new()
        };
        Ok(MigrationPlan::resolve(definitions, &entries))
    }

    /// Apply every pending migration in identity order.
    ///
    /// `cancel` is checked between migrations; a migration that has started
    /// always finishes or rolls back, it is never interrupted mid-flight.
    pub async fn apply_all(
        &self,
        definitions: &[MigrationFile],
        cancel: &AtomicBool,
    ) -> EngineResult<ApplyReport> {
        self.lock.acquire(self.db).await?;
        let result = self.apply_inner(definitions, cancel).await;
        // Always release, whatever happened to the batch
        self.lock.release(self.db).await;
        result
    }

    async fn apply_inner(
        &self,
        definitions: &[MigrationFile],
        cancel: &AtomicBool,
    ) -> EngineResult<ApplyReport> {
        self.ledger.ensure_table(self.db).await?;
        let entries = self.ledger.entries(self.db).await?;
        let plan = MigrationPlan::resolve(definitions, &entries);

        for orphan in &plan.orphaned {
            log::warn!(
                "Ledger entry {}_{} has no migration file on disk",
                orphan.id,
                orphan.name
            );
        }
        for drift in &plan.drifted {
            log::warn!(
                "Migration {} changed after it was applied (ledger {}, file {})",
                drift.id,
                drift.ledger_checksum,
                drift.file_checksum
            );
        }

        let mut report = ApplyReport {
            applied: Vec::new(),
            failed: None,
            skipped: 0,
            cancelled: false,
            orphaned: plan.orphaned.clone(),
            drifted: plan.drifted.clone(),
        };

        let total = plan.pending.len();
        for (i, migration) in plan.pending.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                log::info!("Cancellation requested, stopping after {} migrations", i);
                report.cancelled = true;
                report.skipped = total - i;
                break;
            }

            log::info!("Applying migration {}", migration.label());
            match self.execute_one(migration, Direction::Up).await {
                Ok(executed) => report.applied.push(executed),
                Err(e) => {
                    report.failed = Some(FailedMigration {
                        id: migration.id,
                        name: migration.name.clone(),
                        error: e.to_string(),
                    });
                    report.skipped = total - i - 1;
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Roll back applied migrations.
    ///
    /// With no target the latest applied migration is reverted. With a
    /// target, every applied migration newer than the target is reverted,
    /// newest first; the target itself stays applied. The whole revert set
    /// is validated before anything executes, so an irreversible migration
    /// in the middle fails the request without touching the schema.
    pub async fn rollback(
        &self,
        definitions: &[MigrationFile],
        target: Option<MigrationId>,
        cancel: &AtomicBool,
    ) -> EngineResult<RollbackReport> {
        self.lock.acquire(self.db).await?;
        let result = self.rollback_inner(definitions, target, cancel).await;
        self.lock.release(self.db).await;
        result
    }

    async fn rollback_inner(
        &self,
        definitions: &[MigrationFile],
        target: Option<MigrationId>,
        cancel: &AtomicBool,
    ) -> EngineResult<RollbackReport> {
        self.ledger.ensure_table(self.db).await?;
        let entries = self.ledger.entries(self.db).await?;

        // Entries to revert, newest first
        let revert: Vec<&LedgerEntry> = match target {
            None => entries.iter().rev().take(1).collect(),
            Some(id) => {
                if !entries.iter().any(|e| e.id == id) {
                    return Err(EngineError::NotApplied {
                        identity: id.to_string(),
                    });
                }
                entries.iter().filter(|e| e.id > id).rev().collect()
            }
        };

        // Validate the whole revert set before executing any of it
        let defs_by_id: HashMap<MigrationId, &MigrationFile> =
            definitions.iter().map(|m| (m.id, m)).collect();
        let mut batch: Vec<(&MigrationFile, Vec<SchemaOperation>)> = Vec::new();
        for entry in &revert {
            let def = defs_by_id
                .get(&entry.id)
                .ok_or_else(|| EngineError::DefinitionNotFound {
                    identity: entry.id.to_string(),
                })?;
            let down = def
                .effective_down()
                .ok_or_else(|| EngineError::NoInverseDefined {
                    identity: def.id.to_string(),
                    name: def.name.clone(),
                    reason: "no explicit down and the up operations cannot be inverted"
                        .to_string(),
                })?;
            batch.push((def, down));
        }

        let mut report = RollbackReport {
            rolled_back: Vec::new(),
            failed: None,
            skipped: 0,
            cancelled: false,
        };

        let total = batch.len();
        for (i, (migration, down)) in batch.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                report.cancelled = true;
                report.skipped = total - i;
                break;
            }

            log::info!("Rolling back migration {}", migration.label());
            match self.execute_one(migration, Direction::Down(down)).await {
                Ok(executed) => report.rolled_back.push(executed),
                Err(e) => {
                    report.failed = Some(FailedMigration {
                        id: migration.id,
                        name: migration.name.clone(),
                        error: e.to_string(),
                    });
                    report.skipped = total - i - 1;
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Run one migration inside its own transaction, ledger write included.
    async fn execute_one(
        &self,
        migration: &MigrationFile,
        direction: Direction<'_>,
    ) -> EngineResult<ExecutedMigration> {
        let started = Instant::now();

        self.db.begin().await?;
        match self.run_operations(migration, &direction).await {
            Ok(()) => {
                self.db.commit().await?;
                Ok(ExecutedMigration {
                    id: migration.id,
                    name: migration.name.clone(),
                    duration_secs: started.elapsed().as_secs_f64(),
                })
            }
            Err(e) => {
                if let Err(rb) = self.db.rollback().await {
                    log::warn!(
                        "Transaction rollback after failed migration {} also failed: {rb}",
                        migration.label()
                    );
                }
                Err(e)
            }
        }
    }

    async fn run_operations(
        &self,
        migration: &MigrationFile,
        direction: &Direction<'_>,
    ) -> EngineResult<()> {
        let failed = |message: String| EngineError::MigrationFailed {
            identity: migration.id.to_string(),
            name: migration.name.clone(),
            message,
        };

        let ops: &[SchemaOperation] = match direction {
            Direction::Up => &migration.up,
            Direction::Down(ops) => ops,
        };
        for op in ops {
            let sql = op.to_sql();
            log::debug!("Executing: {sql}");
            self.db
                .execute_batch(&sql)
                .await
                .map_err(|e| failed(e.to_string()))?;
        }

        match direction {
            Direction::Up => self
                .ledger
                .record(self.db, migration, Utc::now())
                .await
                .map_err(|e| failed(format!("ledger write failed: {e}"))),
            Direction::Down(_) => self
                .ledger
                .remove(self.db, migration.id)
                .await
                .map_err(|e| failed(format!("ledger delete failed: {e}"))),
        }
    }
}

/// Which set of operations `execute_one` runs, and which ledger write pairs
/// with them.
enum Direction<'a> {
    Up,
    Down(&'a [SchemaOperation]),
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
