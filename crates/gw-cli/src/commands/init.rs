//! Init command implementation - scaffolds a new Groundwork project

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = Path::new(&args.name);

    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    println!("Creating new Groundwork project: {}\n", args.name);

    let migrations_dir = project_dir.join("migrations");
    fs::create_dir_all(&migrations_dir)
        .with_context(|| format!("Failed to create directory: {}", migrations_dir.display()))?;

    // Generate groundwork.yml
    // Escape YAML special characters in interpolated values
    let safe_name = args.name.replace('"', "\\\"");
    let safe_db_path = args.database_path.replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{name}"
version: "1.0.0"

migration_paths: ["migrations"]

database:
  type: duckdb
  path: "{db_path}"

# Bookkeeping tables; rename them if they clash with your schema.
# ledger_table: gw_migrations
# lock_table: gw_lock
# lock_timeout_secs: 10

# Named targets override the database connection; select one with
# --target or the GW_TARGET environment variable.
# targets:
#   prod:
#     database:
#       type: duckdb
#       path: "prod.duckdb"
"#,
        name = safe_name,
        db_path = safe_db_path,
    );
    fs::write(project_dir.join("groundwork.yml"), config_content)
        .context("Failed to write groundwork.yml")?;

    // Generate an example migration with a timestamp identity
    let identity = Utc::now().format("%Y%m%d%H%M%S");
    let example_file = format!("{identity}_create_example.yml");
    let example_content = r#"description: "Example migration; edit or delete before applying"

up:
  - create_table:
      name: example
      columns:
        - name: id
          type: bigint
          primary_key: true
        - name: label
          type: string
          nullable: false
      timestamps: true

# Rollback is derived automatically: create_table inverts to drop_table.
# Add an explicit down section to override it.
"#;
    fs::write(migrations_dir.join(&example_file), example_content)
        .context("Failed to write example migration")?;

    // Generate .gitignore
    let gitignore = "*.duckdb\n*.duckdb.wal\n";
    fs::write(project_dir.join(".gitignore"), gitignore).context("Failed to write .gitignore")?;

    println!("  Created groundwork.yml");
    println!("  Created migrations/{example_file}");
    println!("  Created .gitignore");
    println!();
    println!("Project '{}' initialized successfully!", args.name);
    println!();
    println!("Next steps:");
    println!("  cd {}", args.name);
    println!("  gw status     # Show pending migrations");
    println!("  gw migrate    # Apply them");

    Ok(())
}
