/**
 * Token Issuer
 *
 * This module mints and verifies the two JWT kinds used for sessions:
 *
 * - **access token** - short-lived, carries the identity claims, never stored
 * - **refresh token** - long-lived, carries only the subject, mirrored into
 *   the user's refresh-token slot
 *
 * Each kind is signed with its own HS256 secret. Every token carries a random
 * `jti`, so two tokens issued for the same user in the same second still
 * differ.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::shared::config::{TokenConfig, TokenSettings};

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Claims carried by refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AccessClaims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        parse_subject(&self.sub)
    }
}

impl RefreshClaims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        parse_subject(&self.sub)
    }
}

fn parse_subject(sub: &str) -> Result<Uuid, TokenError> {
    Uuid::parse_str(sub).map_err(|_| TokenError::InvalidSubject(sub.to_string()))
}

/// Access/refresh pair produced by one authentication event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("invalid subject in token: {0}")]
    InvalidSubject(String),
}

impl TokenError {
    /// True when the signature was valid but the token has expired.
    pub fn is_expired(&self) -> bool {
        matches!(
            self,
            Self::Jwt(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature)
        )
    }
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_secs: i64,
}

impl SigningKeys {
    fn new(settings: &TokenSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            expiry_secs: settings.expiry.num_seconds(),
        }
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<T>(token, &self.decoding, &validation)?;
        Ok(token_data.claims)
    }
}

/// Mints and verifies access and refresh tokens
///
/// Built once from a [`TokenConfig`] and shared by cloning.
#[derive(Clone)]
pub struct TokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            access: SigningKeys::new(&config.access),
            refresh: SigningKeys::new(&config.refresh),
        }
    }

    /// Access token lifetime in seconds (used for cookie Max-Age)
    pub fn access_ttl_secs(&self) -> i64 {
        self.access.expiry_secs
    }

    /// Refresh token lifetime in seconds (used for cookie Max-Age)
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh.expiry_secs
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue(&self, user: &User) -> Result<TokenPair, TokenError> {
        let now = Utc::now().timestamp();

        let access_claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            iat: now,
            exp: now + self.access.expiry_secs,
            jti: Uuid::new_v4().to_string(),
        };
        let refresh_claims = RefreshClaims {
            sub: user.id.to_string(),
            iat: now,
            exp: now + self.refresh.expiry_secs,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(TokenPair {
            access_token: self.access.sign(&access_claims)?,
            refresh_token: self.refresh.sign(&refresh_claims)?,
        })
    }

    /// Verify signature and expiry of an access token
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.access.verify(token)
    }

    /// Verify signature and expiry of a refresh token
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.refresh.verify(token)
    }
}
