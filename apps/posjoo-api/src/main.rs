//! Posjoo API - Point-of-sale back-office service
//!
//! HTTP service managing the users and products of merchants. Rows live in
//! MySQL, photos in an S3-compatible bucket.

mod config;
mod dto;
mod error;
mod handlers;
mod routes;

use anyhow::{Context, Result};
use posjoo_domain::{ProductUsecase, UserUsecase};
use posjoo_mysql::{MySqlProductRepository, MySqlUserRepository};
use posjoo_s3::{build_client, S3PhotoStorage};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_usecase: Arc<UserUsecase<MySqlUserRepository, S3PhotoStorage>>,
    pub product_usecase: Arc<ProductUsecase<MySqlProductRepository, S3PhotoStorage>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Posjoo API");

    let config = AppConfig::from_env()?;

    let pool = posjoo_mysql::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to MySQL")?;
    if config.run_migrations {
        posjoo_mysql::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let s3_client = build_client(config.s3_endpoint.as_deref(), &config.s3_region).await;
    let storage = S3PhotoStorage::new(s3_client, config.bucket.clone(), config.public_url.clone());

    info!(
        role_guard = ?config.usecase.role_guard,
        stale_update_policy = ?config.usecase.stale_update_policy,
        "Initializing usecases"
    );

    let state = AppState {
        user_usecase: Arc::new(UserUsecase::new(
            MySqlUserRepository::new(pool.clone()),
            storage.clone(),
            config.usecase,
        )),
        product_usecase: Arc::new(ProductUsecase::new(
            MySqlProductRepository::new(pool),
            storage,
            config.usecase,
        )),
    };

    // Build HTTP router
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
