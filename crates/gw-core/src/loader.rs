//! Migration discovery: scanning directories into an ordered set.

use crate::error::{CoreError, CoreResult};
use crate::id::MigrationId;
use crate::migration::MigrationFile;
use std::path::{Path, PathBuf};

/// Load every migration under the given directories, sorted by identity.
///
/// Directories are scanned non-recursively. Only `.yml`/`.yaml` files are
/// considered; anything else (`.gitkeep`, editor backups, READMEs) is
/// skipped. A YAML file whose name does not follow `<identity>_<name>` is an
/// error rather than a skip, since a silently ignored migration is how
/// schemas drift.
pub fn load_migrations(dirs: &[PathBuf]) -> CoreResult<Vec<MigrationFile>> {
    let mut migrations = Vec::new();
    for dir in dirs {
        load_dir(dir, &mut migrations)?;
    }

    // Sort by identity, path as tiebreak so duplicate reporting is stable
    migrations.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.path.cmp(&b.path)));
    for pair in migrations.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(CoreError::DuplicateIdentity {
                identity: pair[0].id.to_string(),
                first: pair[0].path.display().to_string(),
                second: pair[1].path.display().to_string(),
            });
        }
    }

    Ok(migrations)
}

fn load_dir(dir: &Path, out: &mut Vec<MigrationFile>) -> CoreResult<()> {
    if !dir.is_dir() {
        return Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => {}
            _ => continue,
        }

        let (id, name) = parse_file_name(&path)?;
        let contents = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        out.push(MigrationFile::parse(id, name, path, &contents)?);
    }

    Ok(())
}

/// Split a migration file name into its identity and name parts.
fn parse_file_name(path: &Path) -> CoreResult<(MigrationId, String)> {
    let file = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or_default()
        .to_string();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CoreError::InvalidFileName {
            file: file.clone(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;

    let (identity, name) =
        stem.split_once('_')
            .ok_or_else(|| CoreError::InvalidFileName {
                file: file.clone(),
                reason: "expected '<identity>_<name>'".to_string(),
            })?;

    let id = MigrationId::parse(identity)?;

    if name.is_empty() {
        return Err(CoreError::InvalidFileName {
            file,
            reason: "migration name is empty".to_string(),
        });
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
            reason: "only lowercase letters, digits, and underscores are allowed".to_string(),
        });
    }

    Ok((id, name.to_string()))
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
