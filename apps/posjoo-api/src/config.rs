//! Service configuration from environment variables

use anyhow::{bail, Context, Result};
use posjoo_domain::{RoleGuard, StaleUpdatePolicy, UsecaseConfig};
use std::num::NonZeroU32;
use tracing::info;

/// Everything the service needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub bucket: String,
    /// Base URL stored photos are served from
    pub public_url: String,
    /// Custom S3 endpoint (MinIO); AWS when unset
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub host: String,
    pub port: u16,
    pub usecase: UsecaseConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections = or_default(&lookup, "DATABASE_MAX_CONNECTIONS", "5")
            .parse::<NonZeroU32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
            .get();

        let run_migrations = or_default(&lookup, "POSJOO_RUN_MIGRATIONS", "true")
            .parse()
            .context("POSJOO_RUN_MIGRATIONS must be true or false")?;

        let port = or_default(&lookup, "API_PORT", "3000")
            .parse()
            .context("API_PORT must be a port number")?;

        let usecase = UsecaseConfig {
            role_guard: parse_role_guard(&or_default(&lookup, "POSJOO_ROLE_GUARD", "any"))?,
            stale_update_policy: parse_stale_update(&or_default(
                &lookup,
                "POSJOO_STALE_UPDATE",
                "propagate",
            ))?,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            run_migrations,
            bucket: or_default(&lookup, "POSJOO_BUCKET", "posjoo"),
            public_url: or_default(&lookup, "POSJOO_PUBLIC_URL", "http://localhost:9000/posjoo"),
            s3_endpoint: lookup("POSJOO_S3_ENDPOINT"),
            s3_region: or_default(&lookup, "AWS_REGION", "us-east-1"),
            host: or_default(&lookup, "API_HOST", "0.0.0.0"),
            port,
            usecase,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}

fn parse_role_guard(value: &str) -> Result<RoleGuard> {
    match value {
        "any" => Ok(RoleGuard::AnyViolation),
        "both" => Ok(RoleGuard::BothViolations),
        other => bail!("POSJOO_ROLE_GUARD must be 'any' or 'both', got '{other}'"),
    }
}

fn parse_stale_update(value: &str) -> Result<StaleUpdatePolicy> {
    match value {
        "propagate" => Ok(StaleUpdatePolicy::PropagateNotFound),
        "snapshot" => Ok(StaleUpdatePolicy::ReturnSnapshot),
        other => bail!("POSJOO_STALE_UPDATE must be 'propagate' or 'snapshot', got '{other}'"),
    }
}
