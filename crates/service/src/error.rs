//! Service error types.

use storage::StorageError;
use thiserror::Error;

/// Errors returned by the health service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The storage layer failed to record the call.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
