//! Sequential migration runner.

use std::path::{Path, PathBuf};

use crate::executor::MigrationExecutor;
use crate::source::discover;
use crate::{MigrateError, Result};

/// Default directory scanned for migration files.
pub const DEFAULT_MIGRATION_DIR: &str = "migration";

/// Applies every migration file in a directory, in file name order.
///
/// Nothing is recorded about which files already ran, so every run executes
/// every file again. The first failure stops the run; files already applied
/// stay applied.
pub struct Migrator<E: MigrationExecutor> {
    executor: E,
    dir: PathBuf,
}

impl<E: MigrationExecutor> Migrator<E> {
    /// Creates a migrator reading scripts from `dir`.
    pub fn new(executor: E, dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            dir: dir.into(),
        }
    }

    /// Directory this migrator reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns a reference to the underlying executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs all migrations and returns the names of the files applied.
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn run(&self) -> Result<Vec<String>> {
        let files = discover(&self.dir).await?;
        tracing::info!(count = files.len(), "found migration files");

        let mut applied = Vec::with_capacity(files.len());
        for file in files {
            tracing::info!(file = %file.name, "executing migration");

            let sql = file.read().await?;
            self.executor
                .execute(&sql)
                .await
                .map_err(|source| MigrateError::Execute {
                    file: file.name.clone(),
                    source,
                })?;

            tracing::info!(file = %file.name, "completed migration");
            applied.push(file.name);
        }

        tracing::info!("all migrations completed successfully");
        Ok(applied)
    }
}
