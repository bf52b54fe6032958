//! gw-core - Core library for Groundwork
//!
//! This crate provides migration definitions and parsing, project
//! configuration, directory discovery, and the pure pending/applied
//! resolution shared by all Groundwork components. Nothing in here touches
//! a database; execution lives in gw-engine.

pub mod checksum;
pub mod config;
pub mod error;
pub mod id;
pub mod loader;
pub mod migration;
pub mod operation;
pub mod plan;
pub(crate) mod serde_helpers;
pub mod sql_utils;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, DbType, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use id::MigrationId;
pub use loader::load_migrations;
pub use migration::MigrationFile;
pub use operation::{ColumnDef, ColumnType, DefaultValue, SchemaOperation};
pub use plan::{ChecksumDrift, LedgerEntry, MigrationPlan};
