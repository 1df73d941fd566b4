//! Health check endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use common::Context;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound on how long a single health call may take to record.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — records the call and reports whether that succeeded.
pub async fn check(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let ctx = Context::background().with_timeout(HEALTH_TIMEOUT);
    state.health_service.handle_health(&ctx).await?;

    Ok(Json(HealthResponse { status: "success" }))
}
