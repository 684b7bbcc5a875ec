/**
 * API Routes
 *
 * This module defines the user account endpoints under `/api/v1/users`.
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/v1/users/register` - User registration (multipart)
 * - `POST /api/v1/users/login` - User login
 * - `POST /api/v1/users/refresh-token` - Exchange a refresh token
 *
 * ## Authenticated
 * - `POST /api/v1/users/logout` - End the session
 * - `GET /api/v1/users/current-user` - Current user profile
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{
    get_current_user, login, logout, refresh_access_token, register,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;

/// Prefix shared by every user endpoint
pub const USERS_PREFIX: &str = "/api/v1/users";

/// Configure API routes
///
/// Authenticated routes sit behind `auth_middleware`, which accepts the
/// access token from the `accessToken` cookie or an `Authorization: Bearer`
/// header.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_access_token));

    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/current-user", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    router.nest(USERS_PREFIX, public.merge(protected))
}
