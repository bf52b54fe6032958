//! New command implementation - scaffolds a timestamped migration file

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_project;

/// Execute the new command
pub(crate) async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    // Same charset rule the loader enforces, checked early for a better error
    if args.name.is_empty()
        || !args
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        anyhow::bail!(
            "Invalid migration name '{}': use lowercase letters, digits and underscores",
            args.name
        );
    }

    let project = load_project(global)?;
    let dir = project.scaffold_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let identity = Utc::now().format("%Y%m%d%H%M%S");
    let file_name = format!("{identity}_{}.yml", args.name);
    let path = dir.join(&file_name);
    if path.exists() {
        // Two scaffolds within the same second collide
        anyhow::bail!("Migration file already exists: {}", path.display());
    }

    let content = format!(
        r#"description: ""

# Forward operations, executed in order inside one transaction.
up: []
  # - create_table:
  #     name: {name}
  #     columns:
  #       - name: id
  #         type: bigint
  #         primary_key: true

# Explicit rollback; omit to derive the inverse of `up` automatically.
# down: []
"#,
        name = args.name
    );
    fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    println!("Edit it to add operations, then run `gw migrate`.");

    Ok(())
}
