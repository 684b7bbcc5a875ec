/**
 * Server Configuration
 *
 * This module loads the server configuration from environment variables and
 * connects the optional PostgreSQL database.
 *
 * # Configuration Sources
 *
 * Values come from the process environment (a `.env` file is loaded by the
 * binary first). Everything except the two token secrets has a default
 * suitable for local development.
 *
 * # Error Handling
 *
 * A missing secret or an unparsable value fails start-up with a
 * `ConfigError`. A database that cannot be reached is logged and the server
 * continues on the in-memory store.
 */

use std::path::PathBuf;

use sqlx::PgPool;

use crate::backend::media::cloudinary::{CloudinaryConfig, DEFAULT_BASE_URL};
use crate::shared::config::{parse_duration, ConfigError, TokenConfig};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (`PORT`)
    pub port: u16,
    /// PostgreSQL connection string (`DATABASE_URL`); `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Token secrets and lifetimes
    pub tokens: TokenConfig,
    /// Cloudinary credentials; `None` selects the local uploader
    pub cloudinary: Option<CloudinaryConfig>,
    /// Directory served under `/static`
    pub public_dir: PathBuf,
    /// Directory for temporary multipart uploads (`UPLOAD_DIR`); kept outside `public_dir`
    pub upload_dir: PathBuf,
    /// bcrypt work factor (`BCRYPT_COST`)
    pub bcrypt_cost: u32,
    /// Request body limit (`MAX_UPLOAD_BYTES`)
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Configuration with defaults for everything except the tokens
    pub fn new(tokens: TokenConfig) -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            tokens,
            cloudinary: None,
            public_dir: PathBuf::from("public"),
            upload_dir: PathBuf::from("tmp/uploads"),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut tokens = TokenConfig::builder()
            .access_secret(get("ACCESS_TOKEN_SECRET").ok_or(ConfigError::MissingValue("ACCESS_TOKEN_SECRET"))?)
            .refresh_secret(get("REFRESH_TOKEN_SECRET").ok_or(ConfigError::MissingValue("REFRESH_TOKEN_SECRET"))?);
        if let Some(expiry) = get("ACCESS_TOKEN_EXPIRY") {
            tokens = tokens.access_expiry(parse_duration(&expiry)?);
        }
        if let Some(expiry) = get("REFRESH_TOKEN_EXPIRY") {
            tokens = tokens.refresh_expiry(parse_duration(&expiry)?);
        }

        let mut config = Self::new(tokens.build()?);

        if let Some(port) = get("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        config.database_url = get("DATABASE_URL");
        if let Some(dir) = get("UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Some(cost) = get("BCRYPT_COST") {
            config.bcrypt_cost = parse_number("BCRYPT_COST", &cost)?;
        }
        if let Some(limit) = get("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_number("MAX_UPLOAD_BYTES", &limit)?;
        }

        config.cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!("Incomplete Cloudinary configuration, storing uploads locally");
                None
            }
        };

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if the connection fails
///
/// Migration failures are logged but do not prevent start-up; the schema
/// might already be current.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRETS: [(&str, &str); 2] = [
        ("ACCESS_TOKEN_SECRET", "access-secret"),
        ("REFRESH_TOKEN_SECRET", "refresh-secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&SECRETS)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_url.is_none());
        assert!(config.cloudinary.is_none());
        assert_eq!(config.upload_dir, PathBuf::from("tmp/uploads"));
        assert!(!config.upload_dir.starts_with(&config.public_dir));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.tokens.access.expiry, chrono::Duration::days(1));
        assert_eq!(config.tokens.refresh.expiry, chrono::Duration::days(10));
    }

    #[test]
    fn test_missing_secret() {
        let err = ServerConfig::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "a")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingValue("REFRESH_TOKEN_SECRET"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = SECRETS.to_vec();
        pairs.extend([
            ("PORT", "9001"),
            ("ACCESS_TOKEN_EXPIRY", "15m"),
            ("REFRESH_TOKEN_EXPIRY", "2w"),
            ("DATABASE_URL", "postgres://localhost/vidauth"),
            ("BCRYPT_COST", "6"),
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "secret"),
        ]);
        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.tokens.access.expiry, chrono::Duration::minutes(15));
        assert_eq!(config.tokens.refresh.expiry, chrono::Duration::weeks(2));
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/vidauth"));
        assert_eq!(config.bcrypt_cost, 6);
        assert_eq!(config.cloudinary.unwrap().cloud_name, "demo");
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = SECRETS.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = ServerConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "PORT", .. }));
    }

    #[test]
    fn test_partial_cloudinary_is_ignored() {
        let mut pairs = SECRETS.to_vec();
        pairs.push(("CLOUDINARY_CLOUD_NAME", "demo"));
        let config = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.cloudinary.is_none());
    }
}
