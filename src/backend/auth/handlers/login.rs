/**
 * Login Handler
 *
 * POST /api/v1/users/login
 *
 * # Authentication Process
 *
 * 1. Look up the user by username or email
 * 2. Verify password using bcrypt
 * 3. Issue an access/refresh pair and store the refresh half
 * 4. Return both tokens and set them as cookies
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};

use crate::backend::auth::cookies::set_token_cookies;
use crate::backend::auth::handlers::types::{ApiResponse, LoginRequest, LoginResponse};
use crate::backend::auth::handshake::SessionHandshake;
use crate::backend::error::BackendError;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - neither username nor email, or no password
/// * `404 Not Found` - no such user
/// * `401 Unauthorized` - wrong password
/// * `500 Internal Server Error` - store or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/v1/users/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "Secure1!pass"
/// }
/// ```
pub async fn login(
    State(handshake): State<SessionHandshake>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<ApiResponse<LoginResponse>>), BackendError> {
    let Json(request) = payload.map_err(|e| BackendError::bad_request(e.body_text()))?;
    let (identifier, password) = request.into_credentials()?;

    let outcome = handshake.login(&identifier, &password).await?;

    let issuer = handshake.issuer();
    let cookies = set_token_cookies(
        &outcome.tokens.access_token,
        issuer.access_ttl_secs(),
        &outcome.tokens.refresh_token,
        issuer.refresh_ttl_secs(),
    )?;

    Ok((
        StatusCode::OK,
        cookies,
        Json(ApiResponse::new(
            StatusCode::OK,
            LoginResponse {
                user: outcome.user,
                access_token: outcome.tokens.access_token,
                refresh_token: outcome.tokens.refresh_token,
            },
            "User logged In successfully",
        )),
    ))
}
