use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::server::{AppOptions, RateLimit};

const MIB: usize = 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Writes need an admin bearer token when set.
    pub require_admin_writes: bool,
    pub rate_limit: Option<RateLimit>,
    pub max_body_bytes: usize,
    pub max_upload_bytes: usize,
}

fn parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid value, got {raw:?}")),
        _ => Ok(default),
    }
}

fn optional<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be a valid value, got {raw:?}")),
        _ => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let require_admin_writes = parsed("REQUIRE_ADMIN_WRITES", true)?;
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if require_admin_writes => {
                bail!("JWT_SECRET must be set when REQUIRE_ADMIN_WRITES is enabled")
            }
            // Nobody can mint tokens for an unknown secret; reads and writes stay open.
            _ => uuid::Uuid::new_v4().to_string(),
        };

        let rate_limit = match (
            optional::<u64>("RATE_LIMIT_PER_SECOND")?,
            optional::<u32>("RATE_LIMIT_BURST")?,
        ) {
            (Some(per_second), burst) => Some(RateLimit {
                per_second,
                burst: burst.unwrap_or(10),
            }),
            (None, _) => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parsed("PORT", 8080)?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "institute-cms".to_string()),
            require_admin_writes,
            rate_limit,
            max_body_bytes: parsed("MAX_BODY_BYTES", 25 * MIB)?,
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", 10 * MIB)?,
        })
    }

    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            require_admin_writes: self.require_admin_writes,
            rate_limit: self.rate_limit,
            max_body_bytes: self.max_body_bytes,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}
