//! Execution of migration scripts against a database.

use async_trait::async_trait;
use sqlx::PgPool;

/// Something that can run a raw SQL script.
#[async_trait]
pub trait MigrationExecutor: Send + Sync {
    /// Executes `sql` as one batch of statements.
    async fn execute(&self, sql: &str) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl MigrationExecutor for PgPool {
    async fn execute(&self, sql: &str) -> Result<(), sqlx::Error> {
        // raw_sql runs multiple statements through the simple query protocol.
        sqlx::raw_sql(sql).execute(self).await?;
        Ok(())
    }
}
