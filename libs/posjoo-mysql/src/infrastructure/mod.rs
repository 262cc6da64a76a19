//! Infrastructure implementations for MySQL persistence

mod error;
mod product_repository;
mod user_repository;

pub use product_repository::MySqlProductRepository;
pub use user_repository::MySqlUserRepository;

use sqlx::{
    migrate::{MigrateError, Migrator},
    mysql::{MySqlPool, MySqlPoolOptions},
};
use tracing::info;

/// Schema migrations from the crate's `migrations` directory
static MIGRATOR: Migrator = sqlx::migrate!();

/// Open a connection pool
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!(max_connections, "MySQL pool ready");
    Ok(pool)
}

/// Apply pending migrations
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!(count = MIGRATOR.iter().count(), "Migrations applied");
    Ok(())
}
