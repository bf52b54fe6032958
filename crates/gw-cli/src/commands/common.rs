//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use gw_core::{load_migrations, Config, MigrationFile};
use gw_db::{Database, DuckDbBackend};
use gw_engine::Runner;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is control flow, not a user-facing
        // error, and must not leak into stderr through anyhow's chain.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: configuration plus the directory it was loaded from.
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Load every migration definition from the configured directories.
    pub(crate) fn load_definitions(&self) -> Result<Vec<MigrationFile>> {
        let dirs = self.config.migration_paths_absolute(&self.root);
        load_migrations(&dirs).context("Failed to load migration definitions")
    }

    /// Directory new migrations are scaffolded into: the first configured
    /// migration path.
    pub(crate) fn scaffold_dir(&self) -> PathBuf {
        let first = self
            .config
            .migration_paths
            .first()
            .map(String::as_str)
            .unwrap_or("migrations");
        self.root.join(first)
    }
}

/// Load the project from the directory specified in global CLI arguments.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config =
        Config::load_from_dir(&root).context("Failed to load project configuration")?;
    Ok(Project { root, config })
}

/// Create a database connection from the project config and optional target
/// override.
///
/// Resolves the target via `Config::resolve_target` and applies any target
/// database override. Relative database paths resolve against the project
/// root so `-p` works from anywhere.
pub(crate) fn create_database_connection(
    project: &Project,
    global: &GlobalArgs,
) -> Result<Arc<dyn Database>> {
    let target = Config::resolve_target(global.target.as_deref());
    let db_config = project
        .config
        .get_database_config(target.as_deref())
        .context("Failed to get database configuration")?;

    let path = resolve_database_path(&project.root, &db_config.path);
    if global.verbose {
        eprintln!("[verbose] Connecting to database at {path}");
    }
    let db: Arc<dyn Database> =
        Arc::new(DuckDbBackend::new(&path).context("Failed to connect to database")?);
    Ok(db)
}

fn resolve_database_path(root: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

/// Build a migration runner bound to the project's ledger and lock tables.
pub(crate) fn build_runner<'a>(project: &Project, db: &'a dyn Database) -> Runner<'a> {
    Runner::new(
        db,
        &project.config.ledger_table,
        &project.config.lock_table,
        Duration::from_secs(project.config.lock_timeout_secs),
    )
}

/// Cancellation flag wired to Ctrl-C.
///
/// The first interrupt requests a graceful stop; the migration in flight
/// always finishes or rolls back before the batch reports as cancelled.
pub(crate) fn spawn_cancel_flag() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, stopping after the current migration...");
            flag.store(true, Ordering::SeqCst);
        }
    });
    cancel
}

// ---------------------------------------------------------------------------
// Table-printing utilities
// ---------------------------------------------------------------------------

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a formatted table to stdout: a left-aligned header row, a dash
/// separator, and each data row, with columns two spaces apart.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  "));

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_cover_headers_and_cells() {
        let headers = ["ID", "NAME"];
        let rows = vec![
            vec!["1".to_string(), "create_products".to_string()],
            vec!["20240101000000".to_string(), "x".to_string()],
        ];
        assert_eq!(calculate_column_widths(&headers, &rows), vec![14, 15]);
    }

    #[test]
    fn test_resolve_database_path() {
        let root = Path::new("/srv/app");
        assert_eq!(resolve_database_path(root, ":memory:"), ":memory:");
        assert_eq!(resolve_database_path(root, "/var/db/x.duckdb"), "/var/db/x.duckdb");
        assert_eq!(
            resolve_database_path(root, "dev.duckdb"),
            "/srv/app/dev.duckdb"
        );
    }
}
