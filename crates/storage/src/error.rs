use common::{ConfigError, ContextError};
use thiserror::Error;

/// Errors that can occur when recording health calls.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The caller's context was cancelled or timed out.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Connection options could not be built from configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure injected by the in-memory storage.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
