//! Health service trait and its storage-backed implementation.

use async_trait::async_trait;
use common::Context;
use storage::HealthStorage;

use crate::Result;

/// Business logic for health checks.
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Processes a health check request.
    async fn handle_health(&self, ctx: &Context) -> Result<()>;
}

/// Records every health check through the configured storage.
pub struct DefaultHealthService<S: HealthStorage> {
    storage: S,
}

impl<S: HealthStorage> DefaultHealthService<S> {
    /// Creates a new service over the given storage.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: HealthStorage> HealthService for DefaultHealthService<S> {
    #[tracing::instrument(skip_all)]
    async fn handle_health(&self, ctx: &Context) -> Result<()> {
        self.storage.save_health_call(ctx).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use common::ContextError;
    use storage::{InMemoryHealthStorage, StorageError};

    use super::*;
    use crate::ServiceError;

    /// Storage that reports whatever the context says, without touching state.
    #[derive(Default)]
    struct ContextEchoStorage {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HealthStorage for ContextEchoStorage {
        async fn save_health_call(&self, ctx: &Context) -> storage::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match ctx.err() {
                Some(err) => Err(err.into()),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn handle_health_records_call() {
        let service = DefaultHealthService::new(InMemoryHealthStorage::new());

        service.handle_health(&Context::background()).await.unwrap();

        assert_eq!(service.storage().call_count(), 1);
    }

    #[tokio::test]
    async fn handle_health_propagates_storage_error() {
        let storage = InMemoryHealthStorage::new();
        storage.set_fail_on_save(true);
        let service = DefaultHealthService::new(storage);

        let err = service
            .handle_health(&Context::background())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Storage(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn handle_health_fails_for_cancelled_context() {
        let service = DefaultHealthService::new(ContextEchoStorage::default());
        let ctx = Context::background().with_cancel();
        ctx.cancel();

        let err = service.handle_health(&ctx).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Storage(StorageError::Context(ContextError::Cancelled))
        ));
        assert_eq!(service.storage().calls.load(Ordering::SeqCst), 1);
    }
}
