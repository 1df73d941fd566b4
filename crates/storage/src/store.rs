use async_trait::async_trait;
use common::Context;

use crate::Result;

/// Persistence capability for health checks.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait HealthStorage: Send + Sync {
    /// Records a single health call.
    ///
    /// Implementations must give up as soon as `ctx` is cancelled or its
    /// deadline passes.
    async fn save_health_call(&self, ctx: &Context) -> Result<()>;
}
