use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::Context;

use crate::{HealthStorage, Result, StorageError};

#[derive(Debug, Default)]
struct InMemoryState {
    calls: Vec<DateTime<Utc>>,
    fail_on_save: bool,
}

/// In-memory health call storage for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHealthStorage {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryHealthStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the storage to fail every save until reset.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state.write().unwrap().fail_on_save = fail;
    }

    /// Returns the number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls.len()
    }

    /// Returns the recorded call timestamps, oldest first.
    pub fn calls(&self) -> Vec<DateTime<Utc>> {
        self.state.read().unwrap().calls.clone()
    }
}

#[async_trait]
impl HealthStorage for InMemoryHealthStorage {
    async fn save_health_call(&self, ctx: &Context) -> Result<()> {
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }

        let mut state = self.state.write().unwrap();
        if state.fail_on_save {
            return Err(StorageError::Unavailable("injected failure".to_string()));
        }
        state.calls.push(Utc::now());
        Ok(())
    }
}
