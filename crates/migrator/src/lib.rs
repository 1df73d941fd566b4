//! Applies ordered SQL migration files to a database.
//!
//! Files ending in `.sql` are executed one at a time in ascending file name
//! order. There is no history table and no rollback.

pub mod error;
pub mod executor;
pub mod runner;
pub mod source;

pub use error::{MigrateError, Result};
pub use executor::MigrationExecutor;
pub use runner::{DEFAULT_MIGRATION_DIR, Migrator};
pub use source::{MigrationFile, discover};
