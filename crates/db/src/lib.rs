//! Database access layer: pool construction, migrations, models, and
//! repositories for the validation history store.

pub mod models;
pub mod repositories;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub use sqlx::PgPool as DbPool;

/// Build a connection pool against `database_url`.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Build a pool without connecting eagerly. Used by tests that only
/// exercise paths that never reach the database.
pub fn create_lazy_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(1).connect_lazy(database_url)
}

/// Run the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Cheap liveness probe used by the health endpoint and at startup.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
