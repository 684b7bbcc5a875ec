//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for the `/api/v1/users` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - Multipart registration handler
//! ├── login.rs     - Credential login handler
//! ├── logout.rs    - Logout handler
//! ├── refresh.rs   - Refresh-token rotation handler
//! └── me.rs        - Current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /register - User registration
//! - **`login`** - POST /login - User authentication
//! - **`logout`** - POST /logout - End the session (authenticated)
//! - **`refresh_access_token`** - POST /refresh-token - Rotate the token pair
//! - **`get_current_user`** - GET /current-user - Profile (authenticated)
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are returned in the body and as `HttpOnly; Secure` cookies
//! - Each refresh token can be exchanged once
//!
//! # Example
//!
//! ```rust,no_run
//! use vidauth::backend::auth::handlers::{login, refresh_access_token};
//! use vidauth::backend::server::AppState;
//! use axum::{routing::post, Router};
//!
//! let router: Router<AppState> = Router::new()
//!     .route("/login", post(login))
//!     .route("/refresh-token", post(refresh_access_token));
//! ```

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Refresh handler
pub mod refresh;

/// Get current user handler
pub mod me;

pub use types::{ApiResponse, LoginRequest, LoginResponse, RefreshRequest, TokenResponse};

pub use login::login;
pub use logout::logout;
pub use me::get_current_user;
pub use refresh::refresh_access_token;
pub use register::register;
