use async_trait::async_trait;
use common::{Config, Context};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::{HealthStorage, Result};

/// Maximum number of pooled connections.
pub const MAX_CONNECTIONS: u32 = 10;

/// Opens a connection pool for the configured database and verifies it.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let options = config.pg_connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    tracing::info!(
        host = %config.database.host,
        database = %config.database.name,
        "connected to database"
    );

    Ok(pool)
}

/// PostgreSQL-backed health call storage.
#[derive(Clone)]
pub struct PostgresHealthStorage {
    pool: PgPool,
}

impl PostgresHealthStorage {
    /// Creates a new storage over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HealthStorage for PostgresHealthStorage {
    #[tracing::instrument(skip_all)]
    async fn save_health_call(&self, ctx: &Context) -> Result<()> {
        ctx.run(
            sqlx::query("INSERT INTO health_calls (called_at) VALUES (NOW())").execute(&self.pool),
        )
        .await??;
        Ok(())
    }
}
