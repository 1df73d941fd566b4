pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{Result, StorageError};
pub use memory::InMemoryHealthStorage;
pub use postgres::{PostgresHealthStorage, connect};
pub use store::HealthStorage;
