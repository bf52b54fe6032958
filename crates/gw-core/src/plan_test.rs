use super::*;
use chrono::TimeZone;

fn mig(id: u64, name: &str) -> MigrationFile {
    MigrationFile::parse(
        MigrationId::from(id),
        name,
        format!("migrations/{id}_{name}.yml"),
        "up:\n  - sql: SELECT 1\n",
    )
    .unwrap()
}

fn entry(id: u64, checksum: &str) -> LedgerEntry {
    LedgerEntry {
        id: MigrationId::from(id),
        name: format!("m{id}"),
        applied_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        checksum: checksum.to_string(),
    }
}

fn entry_for(m: &MigrationFile) -> LedgerEntry {
    LedgerEntry {
        id: m.id,
        name: m.name.clone(),
        applied_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        checksum: m.checksum.clone(),
    }
}

#[test]
fn test_everything_pending_on_fresh_database() {
    let defs = vec![mig(1, "a"), mig(2, "b")];
    let plan = MigrationPlan::resolve(&defs, &[]);
    assert_eq!(plan.pending.len(), 2);
    assert!(plan.applied.is_empty());
    assert!(plan.orphaned.is_empty());
    assert!(plan.drifted.is_empty());
    assert!(!plan.is_up_to_date());
}

#[test]
fn test_applied_migrations_are_not_pending() {
    let defs = vec![mig(1, "a"), mig(2, "b"), mig(3, "c")];
    let ledger = vec![entry_for(&defs[0])];
    let plan = MigrationPlan::resolve(&defs, &ledger);
    let names: Vec<&str> = plan.pending.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);
    assert_eq!(plan.applied.len(), 1);
}

#[test]
fn test_pending_sorted_numerically() {
    // Deliberately unsorted input: resolution must not depend on load order
    let defs = vec![mig(10, "later"), mig(2, "earlier")];
    let plan = MigrationPlan::resolve(&defs, &[]);
    let names: Vec<&str> = plan.pending.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["earlier", "later"]);
}

#[test]
fn test_gap_in_ledger_stays_pending() {
    let defs = vec![mig(1, "a"), mig(2, "b"), mig(3, "c")];
    let ledger = vec![entry_for(&defs[0]), entry_for(&defs[2])];
    let plan = MigrationPlan::resolve(&defs, &ledger);
    let names: Vec<&str> = plan.pending.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["b"]);
}

#[test]
fn test_orphaned_entry_detected() {
    let defs = vec![mig(1, "a")];
    let ledger = vec![entry_for(&defs[0]), entry(99, "whatever")];
    let plan = MigrationPlan::resolve(&defs, &ledger);
    assert_eq!(plan.orphaned.len(), 1);
    assert_eq!(plan.orphaned[0].id, MigrationId::from(99));
    assert_eq!(plan.applied.len(), 1);
    assert!(plan.pending.is_empty());
    assert!(plan.is_up_to_date());
}

#[test]
fn test_checksum_drift_detected() {
    let defs = vec![mig(1, "a")];
    let ledger = vec![entry(1, "different_checksum")];
    let plan = MigrationPlan::resolve(&defs, &ledger);
    assert_eq!(plan.drifted.len(), 1);
    assert_eq!(plan.drifted[0].file_checksum, defs[0].checksum);
    assert_eq!(plan.drifted[0].ledger_checksum, "different_checksum");
    // Drift is a warning; the entry still counts as applied
    assert_eq!(plan.applied.len(), 1);
    assert!(plan.pending.is_empty());
}
