/**
 * Register Handler
 *
 * POST /api/v1/users/register
 *
 * Accepts `multipart/form-data` with text fields `fullName`, `email`,
 * `username`, `password` and file fields `avatar` (required) and
 * `coverImage` (optional). File parts are spooled into the temporary upload
 * directory before the registration flow runs; the flow removes them again
 * on every exit path.
 */

use std::path::{Path, PathBuf};

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::backend::auth::handlers::types::ApiResponse;
use crate::backend::auth::registration::{Registration, RegistrationForm};
use crate::backend::auth::users::UserProfile;
use crate::backend::error::BackendError;
use crate::backend::media::discard_local;
use crate::backend::server::state::UploadSettings;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - malformed multipart body, blank or invalid fields,
///   missing avatar
/// * `409 Conflict` - username or email already registered
/// * `500 Internal Server Error` - store, hashing or disk failure
///
/// # Example Response
///
/// ```json
/// {
///   "statusCode": 201,
///   "data": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "username": "jdoe",
///     "email": "jdoe@example.com",
///     "fullName": "Jane Doe",
///     "avatar": "https://res.cloudinary.com/demo/image/upload/a.png",
///     "coverImage": ""
///   },
///   "message": "User registered Successfully",
///   "success": true
/// }
/// ```
pub async fn register(
    State(registration): State<Registration>,
    State(uploads): State<UploadSettings>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), BackendError> {
    let multipart = multipart.map_err(|e| BackendError::bad_request(e.body_text()))?;

    let mut form = RegistrationForm::default();
    if let Err(e) = read_form(multipart, &uploads.temp_dir, &mut form).await {
        for path in [&form.avatar, &form.cover_image].into_iter().flatten() {
            discard_local(path).await;
        }
        return Err(e);
    }

    tracing::info!("Registration request for username: {}", form.username);
    let profile = registration.register(form).await?;
    tracing::info!("User registered: {} ({})", profile.username, profile.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED,
            profile,
            "User registered Successfully",
        )),
    ))
}

async fn read_form(
    mut multipart: Multipart,
    temp_dir: &Path,
    form: &mut RegistrationForm,
) -> Result<(), BackendError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BackendError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fullName" => form.full_name = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            "username" => form.username = read_text(field).await?,
            "password" => form.password = read_text(field).await?,
            "avatar" => {
                if let Some(path) = spool_file(field, temp_dir).await? {
                    replace_upload(&mut form.avatar, path).await;
                }
            }
            "coverImage" => {
                if let Some(path) = spool_file(field, temp_dir).await? {
                    replace_upload(&mut form.cover_image, path).await;
                }
            }
            other => tracing::debug!("Ignoring unknown multipart field: {}", other),
        }
    }
    Ok(())
}

async fn read_text(field: Field<'_>) -> Result<String, BackendError> {
    field
        .text()
        .await
        .map_err(|e| BackendError::bad_request(e.body_text()))
}

/// Write a file part to `temp_dir`; empty parts count as absent.
async fn spool_file(field: Field<'_>, temp_dir: &Path) -> Result<Option<PathBuf>, BackendError> {
    let file_name = sanitize_file_name(field.file_name().unwrap_or("upload"));
    let bytes = field
        .bytes()
        .await
        .map_err(|e| BackendError::bad_request(e.body_text()))?;
    if bytes.is_empty() {
        return Ok(None);
    }

    tokio::fs::create_dir_all(temp_dir).await.map_err(|e| {
        tracing::error!("Failed to create upload directory {:?}: {:?}", temp_dir, e);
        BackendError::internal("Failed to store uploaded file")
    })?;

    let path = temp_dir.join(format!("{}-{}", Uuid::new_v4(), file_name));
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        tracing::error!("Failed to write upload {:?}: {:?}", path, e);
        BackendError::internal("Failed to store uploaded file")
    })?;

    Ok(Some(path))
}

/// A repeated file field keeps the last part only.
async fn replace_upload(slot: &mut Option<PathBuf>, path: PathBuf) {
    if let Some(previous) = slot.replace(path) {
        discard_local(&previous).await;
    }
}

/// Reduce a client-supplied file name to a safe single path component.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
