//! PostgreSQL storage for Bedwatch.
//!
//! [`repositories`] hold the SQL, one zero-sized repo per table;
//! [`PgBackend`] adapts them to the backend traits of `bedwatch-core`.

use sqlx::postgres::PgPoolOptions;

mod backend;
mod error;
pub mod models;
pub mod repositories;

pub use backend::PgBackend;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
