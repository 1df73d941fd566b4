//! Shared building blocks for the manager service and the migrator.

pub mod config;
pub mod context;
pub mod telemetry;

pub use config::{Config, ConfigError, DatabaseConfig, TlsConfig};
pub use context::{Context, ContextError};
