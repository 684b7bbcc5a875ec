/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container, holding:
 * - The session handshake (login, logout, refresh, access-token checks)
 * - The registration flow with its media uploader
 * - Upload and static-file settings
 *
 * The credential store and uploader are shared behind `Arc<dyn ...>`, so
 * cloning the state is cheap and every handler sees the same store.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract just the part they
 * need, e.g. `State(handshake): State<SessionHandshake>`.
 */

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::handshake::SessionHandshake;
use crate::backend::auth::registration::Registration;
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::auth::users::CredentialStore;
use crate::backend::media::MediaUploader;
use crate::backend::server::config::ServerConfig;

/// Where multipart file parts are spooled before upload
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub temp_dir: PathBuf,
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub handshake: SessionHandshake,
    pub registration: Registration,
    pub uploads: UploadSettings,
    /// Directory served under `/static`
    pub public_dir: PathBuf,
    /// Request body limit applied to every route
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        store: Arc<dyn CredentialStore>,
        media: Arc<dyn MediaUploader>,
    ) -> Self {
        let issuer = TokenIssuer::new(&config.tokens);
        Self {
            handshake: SessionHandshake::new(store.clone(), issuer),
            registration: Registration::new(store, media, config.bcrypt_cost),
            uploads: UploadSettings {
                temp_dir: config.upload_dir.clone(),
            },
            public_dir: config.public_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl FromRef<AppState> for SessionHandshake {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.handshake.clone()
    }
}

impl FromRef<AppState> for Registration {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registration.clone()
    }
}

impl FromRef<AppState> for UploadSettings {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.uploads.clone()
    }
}
