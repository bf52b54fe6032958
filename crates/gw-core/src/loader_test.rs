use super::*;

const MINIMAL_BODY: &str = "up:\n  - sql: SELECT 1\n";

fn write_migration(dir: &Path, file: &str, body: &str) {
    std::fs::write(dir.join(file), body).unwrap();
}

#[test]
fn test_load_sorted_numerically() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "10_third.yml", MINIMAL_BODY);
    write_migration(dir.path(), "2_first.yml", MINIMAL_BODY);
    write_migration(dir.path(), "9_second.yaml", MINIMAL_BODY);

    let migrations = load_migrations(&[dir.path().to_path_buf()]).unwrap();
    let names: Vec<&str> = migrations.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn test_skips_non_yaml_files() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "1_only.yml", MINIMAL_BODY);
    std::fs::write(dir.path().join(".gitkeep"), "").unwrap();
    std::fs::write(dir.path().join("README.md"), "# notes").unwrap();
    std::fs::write(dir.path().join("1_only.yml.bak"), "junk").unwrap();
    std::fs::create_dir(dir.path().join("archive")).unwrap();

    let migrations = load_migrations(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(migrations.len(), 1);
}

#[test]
fn test_yaml_without_identity_prefix_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "noprefix.yml", MINIMAL_BODY);

    let err = load_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidFileName { .. }));
}

#[test]
fn test_non_numeric_identity_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "abc_create.yml", MINIMAL_BODY);

    let err = load_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidIdentity { .. }));
}

#[test]
fn test_name_charset_enforced() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "1_CreateProducts.yml", MINIMAL_BODY);

    let err = load_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(matches!(err, CoreError::InvalidName { .. }));
}

#[test]
fn test_duplicate_identity_across_zero_padding() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "007_one.yml", MINIMAL_BODY);
    write_migration(dir.path(), "7_other.yml", MINIMAL_BODY);

    let err = load_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    match err {
        CoreError::DuplicateIdentity {
            identity,
            first,
            second,
        } => {
            assert_eq!(identity, "7");
            assert!(first.contains("007_one.yml"));
            assert!(second.contains("7_other.yml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_duplicate_identity_across_directories() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_migration(a.path(), "5_here.yml", MINIMAL_BODY);
    write_migration(b.path(), "5_there.yml", MINIMAL_BODY);

    let err =
        load_migrations(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateIdentity { .. }));
}

#[test]
fn test_missing_directory_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does_not_exist");

    let err = load_migrations(&[missing]).unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirNotFound { .. }));
}

#[test]
fn test_multiple_directories_merge() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_migration(a.path(), "2_from_a.yml", MINIMAL_BODY);
    write_migration(b.path(), "1_from_b.yml", MINIMAL_BODY);

    let migrations = load_migrations(&[a.path().to_path_buf(), b.path().to_path_buf()]).unwrap();
    let names: Vec<&str> = migrations.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["from_b", "from_a"]);
}

#[test]
fn test_body_parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_migration(dir.path(), "1_broken.yml", "up: [not an operation]\n");

    let err = load_migrations(&[dir.path().to_path_buf()]).unwrap_err();
    assert!(err.to_string().contains("1_broken.yml"));
}

#[test]
fn test_empty_directory_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let migrations = load_migrations(&[dir.path().to_path_buf()]).unwrap();
    assert!(migrations.is_empty());
}
