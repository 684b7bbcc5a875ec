/**
 * Registration
 *
 * # Registration Process
 *
 * 1. Require `fullName`, `email`, `username`, `password` to be non-blank
 * 2. Validate email shape, username format and password strength
 * 3. Reject when the username (case-insensitive) or email already exists
 * 4. Require an avatar file; upload it and the optional cover image
 * 5. Hash the password with bcrypt and create the user
 * 6. Re-fetch the user and return it without secrets
 *
 * Temporary upload files are removed on every exit path.
 */

use std::path::PathBuf;
use std::sync::Arc;

use bcrypt::hash;

use crate::backend::auth::users::{CredentialStore, NewUser, UserProfile};
use crate::backend::error::BackendError;
use crate::backend::media::{discard_local, MediaUploader};
use crate::shared::validation::{
    normalize_email, normalize_username, require_non_blank, validate_email, validate_password,
    validate_username,
};

const AVATAR_REQUIRED: &str = "Avatar file is required";

/// Validated-at-the-boundary registration input
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    /// Temporary file holding the avatar upload
    pub avatar: Option<PathBuf>,
    /// Temporary file holding the cover image upload
    pub cover_image: Option<PathBuf>,
}

impl RegistrationForm {
    async fn discard_uploads(&self) {
        for path in [&self.avatar, &self.cover_image].into_iter().flatten() {
            discard_local(path).await;
        }
    }
}

#[derive(Clone)]
pub struct Registration {
    store: Arc<dyn CredentialStore>,
    media: Arc<dyn MediaUploader>,
    bcrypt_cost: u32,
}

impl Registration {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        media: Arc<dyn MediaUploader>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            store,
            media,
            bcrypt_cost,
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - blank fields, invalid email/username/password, missing
    ///   or failed avatar upload
    /// * `Conflict` - username or email already registered
    /// * `Internal` - hashing, store failure, or the created user cannot be re-read
    pub async fn register(&self, form: RegistrationForm) -> Result<UserProfile, BackendError> {
        let result = self.register_inner(&form).await;
        if result.is_err() {
            form.discard_uploads().await;
        }
        result
    }

    async fn register_inner(&self, form: &RegistrationForm) -> Result<UserProfile, BackendError> {
        require_non_blank(&[
            form.full_name.as_str(),
            form.email.as_str(),
            form.username.as_str(),
            form.password.as_str(),
        ])?;

        let email = normalize_email(&form.email);
        let username = normalize_username(&form.username);
        validate_email(&email)?;
        validate_username(&username)?;
        validate_password(&form.password)?;

        tracing::info!("Signup request for username: {}, email: {}", username, email);

        if self
            .store
            .find_by_username_or_email(Some(&username), Some(&email))
            .await?
            .is_some()
        {
            tracing::warn!("User already exists: {} / {}", username, email);
            return Err(BackendError::conflict(
                "User with email or username already exists",
            ));
        }

        let avatar_path = form
            .avatar
            .as_deref()
            .ok_or_else(|| BackendError::bad_request(AVATAR_REQUIRED))?;

        let avatar = self
            .media
            .upload(avatar_path)
            .await
            .ok_or_else(|| BackendError::bad_request(AVATAR_REQUIRED))?;
        let cover_image = match form.cover_image.as_deref() {
            Some(path) => self.media.upload(path).await,
            None => None,
        };

        let password_hash = hash(&form.password, self.bcrypt_cost).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            BackendError::internal("Something went wrong while registering the user")
        })?;

        let created = self
            .store
            .create(NewUser {
                username,
                email,
                full_name: form.full_name.trim().to_string(),
                avatar: avatar.url,
                cover_image: cover_image.map(|media| media.url).unwrap_or_default(),
                password_hash,
            })
            .await?;

        let user = self
            .store
            .find_by_id(created.id)
            .await?
            .ok_or_else(|| {
                tracing::error!("User {} missing right after creation", created.id);
                BackendError::internal("Something went wrong while registering the user")
            })?;

        tracing::info!("User created successfully: {} ({})", user.username, user.email);
        Ok(UserProfile::from(user))
    }
}
