//! Shared Error Types
//!
//! Errors raised by input validation before a request reaches the session
//! handshake or the registration flow. The backend maps every variant to a
//! `400 Bad Request`.
//!
//! # Usage
//!
//! ```rust
//! use vidauth::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email format");
//! assert_eq!(error.to_string(), "Invalid email format");
//! ```
use thiserror::Error;

/// Validation failures shared by every request schema
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A single field failed validation
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// One or more required fields were missing or blank
    #[error("{message}")]
    MissingFields {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new missing-fields error
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingFields {
            message: message.into(),
        }
    }

    /// Name of the offending field, when the error concerns exactly one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::MissingFields { .. } => None,
        }
    }
}
