/**
 * Get Current User Handler
 *
 * GET /api/v1/users/current-user (requires authentication)
 *
 * Returns the authenticated user's profile without password hash or
 * refresh token.
 */

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::handlers::types::ApiResponse;
use crate::backend::auth::handshake::SessionHandshake;
use crate::backend::auth::users::UserProfile;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;

pub async fn get_current_user(
    State(handshake): State<SessionHandshake>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, BackendError> {
    let profile = handshake.current_user(user.user_id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK,
        profile,
        "Current user fetched successfully",
    )))
}
