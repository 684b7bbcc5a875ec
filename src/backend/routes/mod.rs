//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports and documentation
//! ├── router.rs      - Main router creation
//! └── api_routes.rs  - User account endpoints
//! ```
//!
//! # Routes
//!
//! - `POST /api/v1/users/register` - User registration
//! - `POST /api/v1/users/login` - User login
//! - `POST /api/v1/users/logout` - Logout (authenticated)
//! - `POST /api/v1/users/refresh-token` - Rotate tokens
//! - `GET /api/v1/users/current-user` - Current user (authenticated)
//! - `GET /static/*` - Files from the public directory
//!
//! Anything else answers with a JSON 404.

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
