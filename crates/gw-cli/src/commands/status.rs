//! Status command implementation

use anyhow::{Context, Result};
use gw_core::{ChecksumDrift, LedgerEntry, MigrationId, MigrationPlan};
use serde::Serialize;
use std::collections::HashSet;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{self, load_project, print_table};

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let definitions = project.load_definitions()?;
    let db = common::create_database_connection(&project, global)?;
    let runner = common::build_runner(&project, db.as_ref());

    let plan = runner.plan(&definitions).await?;

    match args.output {
        StatusOutput::Table => print_status_table(&plan),
        StatusOutput::Json => print_status_json(&plan)?,
    }
    Ok(())
}

fn print_status_table(plan: &MigrationPlan) {
    let drifted: HashSet<MigrationId> = plan.drifted.iter().map(|d| d.id).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for entry in &plan.applied {
        let status = if drifted.contains(&entry.id) {
            "applied (drifted)"
        } else {
            "applied"
        };
        rows.push(vec![
            status.to_string(),
            entry.id.to_string(),
            entry.name.clone(),
            entry.applied_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    for entry in &plan.orphaned {
        rows.push(vec![
            "orphaned".to_string(),
            entry.id.to_string(),
            entry.name.clone(),
            entry.applied_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    for migration in &plan.pending {
        rows.push(vec![
            "pending".to_string(),
            migration.id.to_string(),
            migration.name.clone(),
            "-".to_string(),
        ]);
    }

    if rows.is_empty() {
        println!("No migrations found.");
        return;
    }

    print_table(&["STATUS", "IDENTITY", "NAME", "APPLIED_AT"], &rows);

    println!();
    println!(
        "{} applied, {} pending",
        plan.applied.len(),
        plan.pending.len()
    );
    if !plan.orphaned.is_empty() {
        println!(
            "{} orphaned ledger entries (file removed after apply)",
            plan.orphaned.len()
        );
    }
    if !plan.drifted.is_empty() {
        println!(
            "{} drifted migrations (file edited after apply)",
            plan.drifted.len()
        );
    }
}

/// JSON status report
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    up_to_date: bool,
    applied: &'a [LedgerEntry],
    pending: Vec<PendingRow<'a>>,
    orphaned: &'a [LedgerEntry],
    drifted: &'a [ChecksumDrift],
}

/// A pending definition trimmed for display
#[derive(Debug, Serialize)]
struct PendingRow<'a> {
    id: MigrationId,
    name: &'a str,
    path: String,
    reversible: bool,
}

fn print_status_json(plan: &MigrationPlan) -> Result<()> {
    let report = StatusReport {
        up_to_date: plan.is_up_to_date(),
        applied: &plan.applied,
        pending: plan
            .pending
            .iter()
            .map(|m| PendingRow {
                id: m.id,
                name: &m.name,
                path: m.path.display().to_string(),
                reversible: m.is_reversible(),
            })
            .collect(),
        orphaned: &plan.orphaned,
        drifted: &plan.drifted,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize status")?;
    println!("{json}");
    Ok(())
}
