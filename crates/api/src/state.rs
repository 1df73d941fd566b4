//! Shared application state.

use std::sync::Arc;

use service::{DefaultHealthService, HealthService};
use storage::HealthStorage;

/// State accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub health_service: Arc<dyn HealthService>,
}

impl AppState {
    /// Wraps an already constructed service.
    pub fn new(health_service: Arc<dyn HealthService>) -> Self {
        Self { health_service }
    }

    /// Wires the default service over the given storage.
    pub fn with_storage<S: HealthStorage + 'static>(storage: S) -> Self {
        Self::new(Arc::new(DefaultHealthService::new(storage)))
    }
}
