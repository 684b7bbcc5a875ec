//! Media Upload Module
//!
//! Registration stores avatar and cover images through a [`MediaUploader`].
//! Uploads work from a temporary file written by the multipart handler; the
//! uploader always removes that file once it is done with it, whether the
//! upload succeeded or not.
//!
//! # Implementations
//!
//! - **`cloudinary`** - signed upload to the Cloudinary REST API
//! - **`local`** - copies the file under the static directory (used when
//!   Cloudinary credentials are not configured)

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cloudinary REST uploader
pub mod cloudinary;

/// Local static-directory uploader
pub mod local;

pub use cloudinary::{CloudinaryConfig, CloudinaryUploader};
pub use local::LocalUploader;

/// A successfully stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    /// Public URL of the stored file
    pub url: String,
}

/// Blob storage used during registration
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Upload the file at `local_path`.
    ///
    /// Returns `None` on any failure; the local file is removed either way.
    async fn upload(&self, local_path: &Path) -> Option<UploadedMedia>;
}

/// Remove a temporary upload, ignoring files that are already gone.
pub async fn discard_local(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Removed temporary upload {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove temporary upload {}: {}", path.display(), e),
    }
}
