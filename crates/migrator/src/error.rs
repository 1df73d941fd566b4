//! Migration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a migration run.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The migration directory could not be listed.
    #[error("failed to read migration directory {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration file could not be read.
    #[error("failed to read migration file {file}: {source}")]
    ReadFile {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// The database rejected a migration file.
    #[error("failed to execute migration {file}: {source}")]
    Execute {
        file: String,
        #[source]
        source: sqlx::Error,
    },
}

impl MigrateError {
    /// Name of the migration file that failed, if the failure was file-specific.
    pub fn file(&self) -> Option<&str> {
        match self {
            MigrateError::ReadDir { .. } => None,
            MigrateError::ReadFile { file, .. } | MigrateError::Execute { file, .. } => Some(file),
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
