//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Groundwork - declarative schema migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "gw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new Groundwork project
    Init(InitArgs),

    /// Scaffold a timestamped migration file
    New(NewArgs),

    /// Apply all pending migrations
    Migrate(MigrateArgs),

    /// Undo applied migrations, newest first
    Rollback(RollbackArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name of the project directory to create
    pub name: String,

    /// Database file path written into groundwork.yml
    #[arg(long, default_value = "dev.duckdb")]
    pub database_path: String,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Migration name (lowercase letters, digits and underscores)
    pub name: String,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Print the SQL that would run without executing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the rollback command
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Roll back every migration applied after this identity; it must itself
    /// be applied
    #[arg(long, value_name = "IDENTITY")]
    pub to: Option<String>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON report
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
