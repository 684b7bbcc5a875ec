//! Shared Module
//!
//! Types that carry no dependency on the HTTP server: validation rules,
//! validation errors and the token configuration handed to the issuer.

/// Shared error types
pub mod error;

/// Input validation rules
pub mod validation;

/// Token configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{ConfigError, TokenConfig, TokenConfigBuilder, TokenSettings};
