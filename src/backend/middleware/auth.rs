/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It takes the access token from the `accessToken`
 * cookie or the `Authorization: Bearer` header, verifies it, and provides
 * the user to handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::cookies::{bearer_token, read_cookie, ACCESS_TOKEN_COOKIE};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data resolved from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the access token (cookie first, then bearer header)
/// 2. Verifies the token and checks the user still exists
/// 3. Attaches user data to request extensions for use in handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let headers = request.headers();
    let token = read_cookie(headers, ACCESS_TOKEN_COOKIE).or_else(|| bearer_token(headers));

    let profile = app_state.handshake.authenticate(token.as_deref()).await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: profile.id,
        username: profile.username,
        email: profile.email,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// This can be used as a parameter in handlers behind `auth_middleware` to
/// extract the authenticated user from request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Unauthorized request")
            })
    }
}
