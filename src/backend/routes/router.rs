/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (`/api/v1/users/...`)
 * 2. Static files (`/static` from the public directory)
 * 3. Fallback handler (404 envelope)
 *
 * Every route shares the request body limit and the HTTP trace layer.
 */

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new(), &app_state);

    let router = router.nest_service("/static", ServeDir::new(&app_state.public_dir));

    let router = router.fallback(not_found);

    router
        .layer(DefaultBodyLimit::max(app_state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}
