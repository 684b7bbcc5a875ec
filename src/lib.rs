//! VidAuth - Main Library
//!
//! VidAuth is the user-account backend of a video platform: registration with
//! avatar/cover uploads, credential login, short-lived access tokens and
//! rotating refresh tokens.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that do not depend on the HTTP server
//!   - Validation rules (email shape, password strength, required fields)
//!   - Token configuration and its builder
//!   - Validation error types
//!
//! - **`backend`** - Axum server
//!   - Credential store (PostgreSQL or in-memory)
//!   - Token issuer and session handshake (login, logout, refresh)
//!   - Registration and media upload
//!   - Routes, middleware and error responses
//!
//! # Session Model
//!
//! Every user holds a single refresh-token slot. Login fills it, refresh
//! swaps it for a new value (the old one stops working immediately), logout
//! clears it. Access tokens are never stored server-side.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vidauth::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and validation rules
pub mod shared;

/// Backend server-side code
pub mod backend;
