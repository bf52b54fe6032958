use super::*;
use serial_test::serial;

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
name: test_project
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.version, "1.0.0");
    assert_eq!(config.migration_paths, vec!["migrations".to_string()]);
    assert_eq!(config.ledger_table, "gw_migrations");
    assert_eq!(config.lock_table, "gw_lock");
    assert_eq!(config.lock_timeout_secs, 10);
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: warehouse
version: "2.1.0"
migration_paths:
  - migrations
  - extra_migrations
database:
  type: duckdb
  path: ./warehouse.duckdb
ledger_table: schema_ledger
lock_table: schema_lock
lock_timeout_secs: 30
targets:
  prod:
    database:
      type: duckdb
      path: ./prod.duckdb
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.name, "warehouse");
    assert_eq!(config.migration_paths.len(), 2);
    assert_eq!(config.ledger_table, "schema_ledger");
    assert_eq!(config.lock_table, "schema_lock");
    assert_eq!(config.lock_timeout_secs, 30);
    assert_eq!(config.available_targets(), vec!["prod"]);
}

#[test]
fn test_unknown_field_rejected() {
    let yaml = r#"
name: test_project
materialization: view
"#;
    let result: Result<Config, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn test_migration_paths_absolute() {
    let config: Config = serde_yaml::from_str("name: test").unwrap();
    let root = std::path::PathBuf::from("/tmp/project");
    assert_eq!(
        config.migration_paths_absolute(&root),
        vec![root.join("migrations")]
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("groundwork.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("groundwork.yml"), "name: demo\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "demo");
}

#[test]
fn test_validate_empty_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groundwork.yml");
    std::fs::write(&path, "name: \"\"\n").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("Project name cannot be empty"));
}

#[test]
fn test_validate_ledger_lock_collision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groundwork.yml");
    std::fs::write(
        &path,
        "name: demo\nledger_table: shared\nlock_table: shared\n",
    )
    .unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("must be distinct"));
}

#[test]
fn test_get_database_config_with_target() {
    let yaml = r#"
name: test_project
database:
  path: ./dev.duckdb
targets:
  prod:
    database:
      path: ./prod.duckdb
  staging: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();

    let base = config.get_database_config(None).unwrap();
    assert_eq!(base.path, "./dev.duckdb");

    let prod = config.get_database_config(Some("prod")).unwrap();
    assert_eq!(prod.path, "./prod.duckdb");

    // Target without a database override falls back to the base config
    let staging = config.get_database_config(Some("staging")).unwrap();
    assert_eq!(staging.path, "./dev.duckdb");

    let err = config.get_database_config(Some("missing")).unwrap_err();
    assert!(err.to_string().contains("Target 'missing' not found"));
}

#[test]
#[serial]
fn test_resolve_target_cli_flag_wins() {
    std::env::set_var("GW_TARGET", "from_env");
    assert_eq!(
        Config::resolve_target(Some("from_cli")),
        Some("from_cli".to_string())
    );
    std::env::remove_var("GW_TARGET");
}

#[test]
#[serial]
fn test_resolve_target_env_fallback() {
    std::env::set_var("GW_TARGET", "from_env");
    assert_eq!(Config::resolve_target(None), Some("from_env".to_string()));
    std::env::remove_var("GW_TARGET");
    assert_eq!(Config::resolve_target(None), None);
}
