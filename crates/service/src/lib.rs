//! Health check service layer.
//!
//! Sits between the HTTP handlers and persistence so that either side can be
//! swapped independently.

pub mod error;
pub mod health;

pub use error::{Result, ServiceError};
pub use health::{DefaultHealthService, HealthService};
