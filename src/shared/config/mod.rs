//! Token configuration module
//!
//! Signing secrets and lifetimes for the two token kinds. The configuration is
//! built once at start-up and handed to the token issuer; nothing reads the
//! environment at signing time.

use chrono::Duration;
use thiserror::Error;

/// Secret and lifetime for one token kind
#[derive(Clone)]
pub struct TokenSettings {
    /// HMAC secret used to sign and verify
    pub secret: String,
    /// Lifetime from issue time
    pub expiry: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Access and refresh token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Short-lived access token settings
    pub access: TokenSettings,
    /// Long-lived refresh token settings
    pub refresh: TokenSettings,
}

impl TokenConfig {
    /// Create a new TokenConfigBuilder
    pub fn builder() -> TokenConfigBuilder {
        TokenConfigBuilder::default()
    }

    /// Validate the configuration
    ///
    /// Secrets must be present and distinct, and the refresh token must
    /// outlive the access token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access.secret.is_empty() {
            return Err(ConfigError::MissingValue("ACCESS_TOKEN_SECRET"));
        }
        if self.refresh.secret.is_empty() {
            return Err(ConfigError::MissingValue("REFRESH_TOKEN_SECRET"));
        }
        if self.access.secret == self.refresh.secret {
            return Err(ConfigError::SharedSecret);
        }
        if self.access.expiry <= Duration::zero() || self.refresh.expiry <= Duration::zero() {
            return Err(ConfigError::InvalidDuration(
                "token expiry must be positive".to_string(),
            ));
        }
        if self.refresh.expiry < self.access.expiry {
            return Err(ConfigError::InvalidDuration(
                "refresh token expiry must not be shorter than access token expiry".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for TokenConfig
#[derive(Debug, Default)]
pub struct TokenConfigBuilder {
    access_secret: Option<String>,
    access_expiry: Option<Duration>,
    refresh_secret: Option<String>,
    refresh_expiry: Option<Duration>,
}

impl TokenConfigBuilder {
    /// Default access token lifetime
    pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 24 * 60 * 60;
    /// Default refresh token lifetime
    pub const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 10 * 24 * 60 * 60;

    /// Set the access token secret
    pub fn access_secret(mut self, secret: impl Into<String>) -> Self {
        self.access_secret = Some(secret.into());
        self
    }

    /// Set the access token lifetime
    pub fn access_expiry(mut self, expiry: Duration) -> Self {
        self.access_expiry = Some(expiry);
        self
    }

    /// Set the refresh token secret
    pub fn refresh_secret(mut self, secret: impl Into<String>) -> Self {
        self.refresh_secret = Some(secret.into());
        self
    }

    /// Set the refresh token lifetime
    pub fn refresh_expiry(mut self, expiry: Duration) -> Self {
        self.refresh_expiry = Some(expiry);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<TokenConfig, ConfigError> {
        let config = TokenConfig {
            access: TokenSettings {
                secret: self
                    .access_secret
                    .ok_or(ConfigError::MissingValue("ACCESS_TOKEN_SECRET"))?,
                expiry: self
                    .access_expiry
                    .unwrap_or_else(|| Duration::seconds(Self::DEFAULT_ACCESS_EXPIRY_SECS)),
            },
            refresh: TokenSettings {
                secret: self
                    .refresh_secret
                    .ok_or(ConfigError::MissingValue("REFRESH_TOKEN_SECRET"))?,
                expiry: self
                    .refresh_expiry
                    .unwrap_or_else(|| Duration::seconds(Self::DEFAULT_REFRESH_EXPIRY_SECS)),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a lifetime such as `15m`, `1h`, `10d` or a bare number of seconds.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    let invalid = || ConfigError::InvalidDuration(value.to_string());

    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => value.split_at(index),
        None => (value, "s"),
    };
    let amount: i64 = number.parse().map_err(|_| invalid())?;

    let seconds = match unit {
        "s" => amount,
        "m" => amount.checked_mul(60).ok_or_else(invalid)?,
        "h" => amount.checked_mul(60 * 60).ok_or_else(invalid)?,
        "d" => amount.checked_mul(24 * 60 * 60).ok_or_else(invalid)?,
        "w" => amount.checked_mul(7 * 24 * 60 * 60).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    Ok(Duration::seconds(seconds))
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("access and refresh tokens must use distinct secrets")]
    SharedSecret,
}
