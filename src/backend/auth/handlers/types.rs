/**
 * Authentication Handler Types
 *
 * Request schemas are checked here, at the transport boundary, before any
 * value reaches the session handshake. Responses are wrapped in the common
 * `ApiResponse` envelope.
 */

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::backend::auth::handshake::LoginIdentifier;
use crate::backend::auth::sessions::TokenPair;
use crate::backend::auth::users::UserProfile;
use crate::shared::SharedError;

/// Success envelope shared by every endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }
}

/// Login request
///
/// Either `username` or `email` identifies the user.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Split into a validated identifier and the password
    pub fn into_credentials(self) -> Result<(LoginIdentifier, String), SharedError> {
        let identifier = LoginIdentifier::new(self.username.as_deref(), self.email.as_deref())
            .ok_or_else(|| SharedError::validation("username", "username or email is required"))?;
        if self.password.is_empty() {
            return Err(SharedError::validation("password", "password is required"));
        }
        Ok((identifier, self.password))
    }
}

/// Refresh request body; the cookie takes precedence when both are sent
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Access/refresh pair as returned to clients
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Login response data
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}
