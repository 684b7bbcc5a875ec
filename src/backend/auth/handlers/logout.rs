/**
 * Logout Handler
 *
 * POST /api/v1/users/logout (requires authentication)
 *
 * Clears the caller's refresh-token slot and both token cookies.
 */

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};

use crate::backend::auth::cookies::clear_token_cookies;
use crate::backend::auth::handlers::types::ApiResponse;
use crate::backend::auth::handshake::SessionHandshake;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;

pub async fn logout(
    State(handshake): State<SessionHandshake>,
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, HeaderMap, Json<ApiResponse<Value>>), BackendError> {
    handshake.logout(user.user_id).await?;

    Ok((
        StatusCode::OK,
        clear_token_cookies(),
        Json(ApiResponse::new(StatusCode::OK, json!({}), "User logged Out")),
    ))
}
