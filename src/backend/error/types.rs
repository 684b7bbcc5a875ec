/**
 * Backend Error Types
 *
 * This module defines the error taxonomy surfaced by every handler.
 *
 * # Error Categories
 *
 * - `BadRequest` - malformed or missing input
 * - `Unauthorized` - missing, invalid, expired or replayed credential/token
 * - `NotFound` - no matching identity
 * - `Conflict` - duplicate identity
 * - `Internal` - unexpected store or issuer failure
 *
 * None of them are retried internally.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::TokenError;
use crate::backend::auth::users::StoreError;
use crate::shared::SharedError;

/// Message used whenever token minting fails, whatever the cause.
pub const TOKEN_GENERATION_FAILED: &str =
    "Something went wrong while generating access and refresh token";

/// Backend-specific error types
///
/// Each variant maps to exactly one HTTP status code and carries the message
/// returned to the caller.
///
/// # Usage
///
/// ```rust
/// use vidauth::backend::error::BackendError;
///
/// let err = BackendError::unauthorized("Invalid refresh token");
/// assert_eq!(err.status_code().as_u16(), 401);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed or missing input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, invalid, expired or replayed credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No identity matched the lookup
    #[error("Not found: {0}")]
    NotFound(String),

    /// The identity already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected failure in the store, the issuer or the server itself
    #[error("Internal error: {0}")]
    Internal(String),

    /// Validation error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `BadRequest`, `SharedError` - 400
    /// - `Unauthorized` - 401
    /// - `NotFound` - 404
    /// - `Conflict` - 409
    /// - `Internal` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the message returned to the caller
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation => {
                Self::conflict("User with email or username already exists")
            }
            StoreError::Database(e) => {
                tracing::error!("Credential store error: {:?}", e);
                Self::internal("Database error")
            }
        }
    }
}

impl From<TokenError> for BackendError {
    /// Only reached while issuing; verification failures are mapped to
    /// `Unauthorized` at the call site.
    fn from(err: TokenError) -> Self {
        tracing::error!("Failed to create token: {:?}", err);
        Self::internal(TOKEN_GENERATION_FAILED)
    }
}
