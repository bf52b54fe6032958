//! Migrate command implementation

use anyhow::Result;
use gw_core::MigrationPlan;
use std::time::Instant;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{self, load_project, ExitCode};

/// Execute the migrate command
pub(crate) async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let start = Instant::now();
    let project = load_project(global)?;
    let definitions = project.load_definitions()?;

    if global.verbose {
        eprintln!(
            "[verbose] Loaded {} migration definitions from {:?}",
            definitions.len(),
            project.config.migration_paths
        );
    }

    let db = common::create_database_connection(&project, global)?;
    let runner = common::build_runner(&project, db.as_ref());

    let plan = runner.plan(&definitions).await?;
    print_plan_warnings(&plan);

    if args.dry_run {
        return print_dry_run(&plan);
    }

    if plan.pending.is_empty() {
        println!(
            "Nothing to migrate; {} applied, ledger is up to date.",
            plan.applied.len()
        );
        return Ok(());
    }

    println!("Applying {} migration(s)...\n", plan.pending.len());

    let cancel = common::spawn_cancel_flag();
    let report = runner.apply_all(&definitions, &cancel).await?;

    for applied in &report.applied {
        println!(
            "  \u{2713} {}_{} [{}ms]",
            applied.id,
            applied.name,
            (applied.duration_secs * 1000.0) as u64
        );
    }
    if let Some(failed) = &report.failed {
        println!("  \u{2717} {}_{} - {}", failed.id, failed.name, failed.error);
    }
    if report.skipped > 0 {
        println!("  {} migration(s) not attempted", report.skipped);
    }

    println!();
    println!(
        "Completed: {} applied, {} failed",
        report.applied.len(),
        usize::from(report.failed.is_some())
    );
    println!("Total time: {}ms", start.elapsed().as_millis());

    if report.cancelled {
        return Err(ExitCode(130).into());
    }
    if report.failed.is_some() {
        return Err(ExitCode(4).into());
    }
    Ok(())
}

/// Print the SQL each pending migration would execute, without touching the
/// database.
fn print_dry_run(plan: &MigrationPlan) -> Result<()> {
    if plan.pending.is_empty() {
        println!("Nothing to migrate; ledger is up to date.");
        return Ok(());
    }

    println!("Would apply {} migration(s):\n", plan.pending.len());
    for migration in &plan.pending {
        println!("-- {}", migration.label());
        for op in &migration.up {
            println!("{};", op.to_sql());
        }
        println!();
    }
    Ok(())
}

/// Surface non-fatal ledger warnings before doing anything else.
fn print_plan_warnings(plan: &MigrationPlan) {
    for orphan in &plan.orphaned {
        eprintln!(
            "Warning: ledger entry {}_{} has no migration file on disk",
            orphan.id, orphan.name
        );
    }
    for drift in &plan.drifted {
        eprintln!(
            "Warning: migration {} changed after it was applied (checksum mismatch)",
            drift.id
        );
    }
}
