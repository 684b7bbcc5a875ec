/**
 * Refresh Handler
 *
 * POST /api/v1/users/refresh-token
 *
 * Takes the refresh token from the `refreshToken` cookie, falling back to a
 * JSON body `{"refreshToken": "..."}`, and exchanges it for a new pair. Any
 * failure is a 401.
 */

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};

use crate::backend::auth::cookies::{read_cookie, set_token_cookies, REFRESH_TOKEN_COOKIE};
use crate::backend::auth::handlers::types::{ApiResponse, RefreshRequest, TokenResponse};
use crate::backend::auth::handshake::SessionHandshake;
use crate::backend::error::BackendError;

pub async fn refresh_access_token(
    State(handshake): State<SessionHandshake>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, HeaderMap, Json<ApiResponse<TokenResponse>>), BackendError> {
    let presented = read_cookie(&headers, REFRESH_TOKEN_COOKIE).or_else(|| {
        serde_json::from_slice::<RefreshRequest>(&body)
            .ok()
            .and_then(|request| request.refresh_token)
    });

    let tokens = handshake.refresh(presented.as_deref()).await?;

    let issuer = handshake.issuer();
    let cookies = set_token_cookies(
        &tokens.access_token,
        issuer.access_ttl_secs(),
        &tokens.refresh_token,
        issuer.refresh_ttl_secs(),
    )?;

    Ok((
        StatusCode::OK,
        cookies,
        Json(ApiResponse::new(
            StatusCode::OK,
            TokenResponse::from(tokens),
            "Access token refreshed",
        )),
    ))
}
