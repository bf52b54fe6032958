//! Pending/applied resolution against the ledger.

use crate::id::MigrationId;
use crate::migration::MigrationFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A row from the applied-migrations ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Migration identity
    pub id: MigrationId,

    /// Migration name as recorded at apply time
    pub name: String,

    /// When the migration was applied (UTC)
    pub applied_at: DateTime<Utc>,

    /// Checksum of the file contents at apply time
    pub checksum: String,
}

/// An applied migration whose file no longer matches the ledger checksum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecksumDrift {
    pub id: MigrationId,
    pub file_checksum: String,
    pub ledger_checksum: String,
}

/// The result of resolving migration definitions against the ledger.
///
/// Resolution is pure set arithmetic: no database access, no clock. Identity
/// order is the only execution order, so `pending` is always sorted and the
/// runner applies it front to back.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPlan {
    /// Definitions with no ledger entry, in identity order
    pub pending: Vec<MigrationFile>,

    /// Ledger entries that match a definition on disk, in identity order
    pub applied: Vec<LedgerEntry>,

    /// Ledger entries with no definition on disk. These warn, never fail:
    /// a teammate's migration that has not been pulled yet looks exactly
    /// like this.
    pub orphaned: Vec<LedgerEntry>,

    /// Applied migrations whose file contents changed since they ran
    pub drifted: Vec<ChecksumDrift>,
}

impl MigrationPlan {
    /// Resolve definitions against the ledger.
    pub fn resolve(definitions: &[MigrationFile], ledger: &[LedgerEntry]) -> Self {
        let defs_by_id: HashMap<MigrationId, &MigrationFile> =
            definitions.iter().map(|m| (m.id, m)).collect();
        let ledger_ids: HashSet<MigrationId> = ledger.iter().map(|e| e.id).collect();

        let mut pending: Vec<MigrationFile> = definitions
            .iter()
            .filter(|m| !ledger_ids.contains(&m.id))
            .cloned()
            .collect();
        pending.sort_by_key(|m| m.id);

        let mut applied = Vec::new();
        let mut orphaned = Vec::new();
        let mut drifted = Vec::new();
        for entry in ledger {
            match defs_by_id.get(&entry.id) {
                Some(def) => {
                    if def.checksum != entry.checksum {
                        drifted.push(ChecksumDrift {
                            id: entry.id,
                            file_checksum: def.checksum.clone(),
                            ledger_checksum: entry.checksum.clone(),
                        });
                    }
                    applied.push(entry.clone());
                }
                None => orphaned.push(entry.clone()),
            }
        }
        applied.sort_by_key(|e| e.id);
        orphaned.sort_by_key(|e| e.id);
        drifted.sort_by_key(|d| d.id);

        Self {
            pending,
            applied,
            orphaned,
            drifted,
        }
    }

    /// True when every definition on disk has been applied.
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
