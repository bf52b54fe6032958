//! Configuration types and parsing for groundwork.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main project configuration from groundwork.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Directories containing migration files, scanned in order
    #[serde(default = "default_migration_paths")]
    pub migration_paths: Vec<String>,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Name of the table recording applied migrations
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// Name of the single-row table backing the batch lock
    #[serde(default = "default_lock_table")]
    pub lock_table: String,

    /// How long to wait for the batch lock before giving up, in seconds
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,

    /// Named target configurations (e.g., dev, staging, prod)
    /// Each target can override database settings
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_migration_paths() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_ledger_table() -> String {
    "gw_migrations".to_string()
}

fn default_lock_table() -> String {
    "gw_lock".to_string()
}

fn default_lock_timeout_secs() -> u64 {
    10
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for groundwork.yml or groundwork.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("groundwork.yml");
        let yaml_path = dir.join("groundwork.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: dir.join("groundwork.yml").display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.migration_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one migration_paths entry must be specified".to_string(),
            });
        }

        for (field, table) in [
            ("ledger_table", &self.ledger_table),
            ("lock_table", &self.lock_table),
        ] {
            if table.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{field} cannot be empty"),
                });
            }
        }

        if self.ledger_table == self.lock_table {
            return Err(CoreError::ConfigInvalid {
                message: "ledger_table and lock_table must be distinct".to_string(),
            });
        }

        Ok(())
    }

    /// Get absolute migration paths relative to a project root
    pub fn migration_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.migration_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Get the list of available target names
    pub fn available_targets(&self) -> Vec<&str> {
        self.targets.keys().map(|s| s.as_str()).collect()
    }

    /// Get target configuration by name
    pub fn get_target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.get(name)
    }

    /// Get database configuration, optionally applying target overrides
    ///
    /// If target is specified and exists, uses target's database config.
    /// Otherwise, uses the base database config.
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.targets
                                    .keys()
                                    .map(|k| k.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            ),
                        })?;

                // Use target's database config if specified, otherwise fall back to base
                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve target from CLI flag or GW_TARGET environment variable
    ///
    /// Priority: CLI flag > GW_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var("GW_TARGET").ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
