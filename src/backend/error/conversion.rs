/**
 * Error Conversion
 *
 * Turns a `BackendError` into the uniform JSON error envelope:
 *
 * ```json
 * {
 *   "statusCode": 401,
 *   "message": "Invalid refresh token",
 *   "success": false
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::backend::error::types::BackendError;

/// Body of every error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
}

impl From<&BackendError> for ErrorEnvelope {
    fn from(err: &BackendError) -> Self {
        Self {
            status_code: err.status_code().as_u16(),
            message: err.message(),
            success: false,
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorEnvelope::from(&self))).into_response()
    }
}
