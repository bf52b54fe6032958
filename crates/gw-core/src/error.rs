//! Error types for gw-core

use thiserror::Error;

/// Core error type for Groundwork
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: Migrations directory not found
    #[error("[E005] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E006: Migration file name does not follow `<identity>_<name>.yml`
    #[error("[E006] Invalid migration file name '{file}': {reason}")]
    InvalidFileName { file: String, reason: String },

    /// E007: Migration identity is not a plain decimal number
    #[error("[E007] Invalid migration identity '{text}': {reason}")]
    InvalidIdentity { text: String, reason: String },

    /// E008: Migration name contains characters outside [a-z0-9_]
    #[error("[E008] Invalid migration name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// E009: Two files resolve to the same identity
    #[error("[E009] Duplicate migration identity {identity}: '{first}' and '{second}'")]
    DuplicateIdentity {
        identity: String,
        first: String,
        second: String,
    },

    /// E010: Failed to parse a migration file body
    #[error("[E010] Failed to parse migration '{path}': {message}")]
    MigrationParseError { path: String, message: String },

    /// E011: Migration defines no operations to apply
    #[error("[E011] Migration '{path}' has an empty 'up' section")]
    EmptyUp { path: String },

    /// E012: IO error
    #[error("[E012] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E013: IO error with file path context
    #[error("[E013] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E014: YAML parse error
    #[error("[E014] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
