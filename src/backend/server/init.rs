/**
 * Server Initialization
 *
 * This module builds the Axum application from a `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Select the credential store: PostgreSQL when `DATABASE_URL` is set and
 *    reachable, otherwise the in-memory store
 * 2. Select the media uploader: Cloudinary when configured, otherwise local
 *    files under the static directory
 * 3. Build the application state and the router
 *
 * The function is resilient in the same way as `load_database`: a missing or
 * unreachable database degrades to the in-memory store with a warning.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::memory::InMemoryCredentialStore;
use crate::backend::auth::users::{CredentialStore, PgCredentialStore};
use crate::backend::media::{CloudinaryUploader, LocalUploader, MediaUploader};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// URL prefix for files stored by the local uploader
pub const LOCAL_UPLOAD_PREFIX: &str = "/static/uploads";

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing VidAuth backend server");

    let store = select_store(config).await;
    let media = select_uploader(config);

    create_router(AppState::new(config, store, media))
}

async fn select_store(config: &ServerConfig) -> Arc<dyn CredentialStore> {
    let pool = match &config.database_url {
        Some(url) => load_database(url).await,
        None => {
            tracing::warn!("DATABASE_URL not set");
            None
        }
    };

    match pool {
        Some(pool) => Arc::new(PgCredentialStore::new(pool)),
        None => {
            tracing::warn!("Using in-memory credential store; users will not survive a restart");
            Arc::new(InMemoryCredentialStore::new())
        }
    }
}

fn select_uploader(config: &ServerConfig) -> Arc<dyn MediaUploader> {
    match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!("Uploading media to Cloudinary cloud {}", cloudinary.cloud_name);
            Arc::new(CloudinaryUploader::new(cloudinary.clone()))
        }
        None => {
            let target = config.public_dir.join("uploads");
            tracing::info!("Cloudinary not configured, storing media in {:?}", target);
            Arc::new(LocalUploader::new(target, LOCAL_UPLOAD_PREFIX))
        }
    }
}
