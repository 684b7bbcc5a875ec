//! Middleware Module
//!
//! This module contains the HTTP middleware for the backend server.
//!
//! - **`auth`** - Authentication middleware for protecting routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use vidauth::backend::auth::handlers::get_current_user;
//! use vidauth::backend::middleware::auth_middleware;
//! use vidauth::backend::server::AppState;
//!
//! fn protected(state: &AppState) -> Router<AppState> {
//!     Router::new()
//!         .route("/current-user", get(get_current_user))
//!         .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
//! }
//! ```

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
