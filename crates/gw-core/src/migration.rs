//! Migration file representation and parsing.

use crate::checksum::compute_checksum;
use crate::error::{CoreError, CoreResult};
use crate::id::MigrationId;
use crate::operation::SchemaOperation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parsed body of a migration YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct MigrationBody {
    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    up: Vec<SchemaOperation>,

    #[serde(default)]
    down: Option<Vec<SchemaOperation>>,
}

/// A migration definition loaded from disk.
///
/// The identity and name come from the file name (`<identity>_<name>.yml`),
/// the operations from the YAML body. The checksum covers the raw file
/// contents and is recorded in the ledger on apply.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationFile {
    /// Identity parsed from the file name prefix
    pub id: MigrationId,

    /// Human-readable name from the file name suffix
    pub name: String,

    /// Path the file was loaded from
    pub path: PathBuf,

    /// SHA256 of the raw file contents
    pub checksum: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Operations executed on apply, in order
    pub up: Vec<SchemaOperation>,

    /// Explicit rollback operations; when absent the inverse of `up` is
    /// derived
    pub down: Option<Vec<SchemaOperation>>,
}

impl MigrationFile {
    /// Parse a migration body, attaching identity and name from the file
    /// name.
    pub fn parse(
        id: MigrationId,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        contents: &str,
    ) -> CoreResult<Self> {
        let path = path.into();
        let body: MigrationBody =
            serde_yaml::from_str(contents).map_err(|e| CoreError::MigrationParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if body.up.is_empty() {
            return Err(CoreError::EmptyUp {
                path: path.display().to_string(),
            });
        }

        for op in body.up.iter().chain(body.down.iter().flatten()) {
            op.validate()
                .map_err(|message| CoreError::MigrationParseError {
                    path: path.display().to_string(),
                    message,
                })?;
        }

        Ok(Self {
            id,
            name: name.into(),
            checksum: compute_checksum(contents),
            description: body.description,
            up: body.up,
            down: body.down,
            path,
        })
    }

    /// The operations a rollback executes for this migration.
    ///
    /// An explicit `down` section always wins, even an empty one. Otherwise
    /// the inverse is derived by inverting `up` in reverse order; if any
    /// operation has no inverse the migration is irreversible and `None` is
    /// returned.
    pub fn effective_down(&self) -> Option<Vec<SchemaOperation>> {
        if let Some(down) = &self.down {
            return Some(down.clone());
        }
        self.up.iter().rev().map(SchemaOperation::invert).collect()
    }

    /// Whether this migration can be rolled back.
    pub fn is_reversible(&self) -> bool {
        self.down.is_some() || self.up.iter().all(|op| op.invert().is_some())
    }

    /// Label used in log and CLI output: `<identity>_<name>`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.id, self.name)
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
