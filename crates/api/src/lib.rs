//! HTTP API server for the manager service.
//!
//! Exposes `GET /health`, which records a health call through the service
//! layer, with structured request logging (tracing).

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
