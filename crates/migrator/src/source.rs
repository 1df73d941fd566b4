//! Discovery of migration files on disk.

use std::path::{Path, PathBuf};

use crate::{MigrateError, Result};

/// Extension a file must carry to be treated as a migration.
pub const MIGRATION_EXTENSION: &str = "sql";

/// A migration script on disk, identified by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub name: String,
    pub path: PathBuf,
}

impl MigrationFile {
    /// Reads the whole script.
    pub async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| MigrateError::ReadFile {
                file: self.name.clone(),
                source,
            })
    }
}

/// Lists the `.sql` files directly inside `dir`, sorted by file name.
///
/// Subdirectories are skipped. Ordering is plain byte-wise comparison of the
/// names, so `010_x.sql` sorts after `009_y.sql` but `10_x.sql` sorts before
/// `9_y.sql`.
pub async fn discover(dir: &Path) -> Result<Vec<MigrationFile>> {
    let read_dir_err = |source| MigrateError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let file_type = entry.file_type().await.map_err(read_dir_err)?;
        if file_type.is_dir() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(MIGRATION_EXTENSION) {
            continue;
        }

        files.push(MigrationFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
