//! Backend Module
//!
//! This module contains all server-side code: the Axum HTTP server, the
//! credential store, token issuing and the user account endpoints.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state and app creation
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Users, tokens, session handshake, registration, handlers
//! - **`media`** - Avatar and cover image upload (Cloudinary or local)
//! - **`middleware`** - Access-token authentication
//! - **`error`** - `BackendError` and its JSON response
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── media/          - Media upload
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! Handlers share the state by cloning `AppState`; the store and uploader
//! live behind `Arc<dyn ...>`. The in-memory store guards its map with a
//! `tokio::sync::RwLock`, the Postgres store relies on the pool.
//!
//! # Error Handling
//!
//! Every handler returns `Result<_, BackendError>`; the error renders as
//! `{statusCode, message, success: false}` with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Media upload
pub mod media;

/// Middleware for request processing
pub mod middleware;

pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
