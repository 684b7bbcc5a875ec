//! Authentication Module
//!
//! This module handles user registration, login and session management with
//! a short-lived access token and a single-use, rotating refresh token.
//!
//! # Architecture
//!
//! - **`users`** - User model and the `CredentialStore` trait with its Postgres implementation
//! - **`memory`** - In-memory `CredentialStore` for development and tests
//! - **`sessions`** - JWT issuing and verification
//! - **`handshake`** - Login, logout, refresh and current-user flows
//! - **`registration`** - Registration flow including media upload
//! - **`cookies`** - Token cookie helpers
//! - **`handlers`** - HTTP handlers for the authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs           - Module exports and documentation
//! ├── users.rs         - User model and store
//! ├── memory.rs        - In-memory store
//! ├── sessions.rs      - JWT token management
//! ├── handshake.rs     - Session flows
//! ├── registration.rs  - Registration flow
//! ├── cookies.rs       - Cookie helpers
//! └── handlers/        - HTTP handlers
//! ```
//!
//! # Session Flow
//!
//! 1. **Register**: multipart form → user created → profile returned
//! 2. **Login**: credentials verified → token pair issued, refresh half stored
//! 3. **Refresh**: stored refresh token presented → new pair, old one invalid
//! 4. **Logout**: stored refresh token cleared
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access and refresh tokens are signed with distinct secrets
//! - A refresh token is valid only while it equals the stored one
//! - Invalid credentials never reveal the stored hash or token

/// User data model and credential store
pub mod users;

/// In-memory credential store
pub mod memory;

/// JWT token generation and validation
pub mod sessions;

/// Login, logout, refresh and current-user flows
pub mod handshake;

/// User registration flow
pub mod registration;

/// Token cookie helpers
pub mod cookies;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handshake::{LoginIdentifier, LoginOutcome, SessionHandshake};
pub use memory::InMemoryCredentialStore;
pub use registration::{Registration, RegistrationForm};
pub use sessions::{TokenIssuer, TokenPair};
pub use users::{CredentialStore, PgCredentialStore, User, UserProfile};
