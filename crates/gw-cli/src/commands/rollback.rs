//! Rollback command implementation

use anyhow::{Context, Result};
use gw_core::MigrationId;
use std::time::Instant;

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::commands::common::{self, load_project, ExitCode};

/// Execute the rollback command
pub(crate) async fn execute(args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    let start = Instant::now();

    let target = match &args.to {
        Some(text) => Some(
            MigrationId::parse(text)
                .with_context(|| format!("Invalid --to identity '{text}'"))?,
        ),
        None => None,
    };

    let project = load_project(global)?;
    let definitions = project.load_definitions()?;
    let db = common::create_database_connection(&project, global)?;
    let runner = common::build_runner(&project, db.as_ref());

    match target {
        Some(id) if global.verbose => {
            eprintln!("[verbose] Rolling back every migration after {id}");
        }
        None if global.verbose => {
            eprintln!("[verbose] Rolling back the most recent migration");
        }
        _ => {}
    }

    let cancel = common::spawn_cancel_flag();
    let report = runner.rollback(&definitions, target, &cancel).await?;

    if report.rolled_back.is_empty() && report.failed.is_none() && !report.cancelled {
        println!("Nothing to roll back.");
        return Ok(());
    }

    for rolled_back in &report.rolled_back {
        println!(
            "  \u{2713} {}_{} [{}ms]",
            rolled_back.id,
            rolled_back.name,
            (rolled_back.duration_secs * 1000.0) as u64
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
        "Completed: {} rolled back, {} failed",
        report.rolled_back.len(),
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
