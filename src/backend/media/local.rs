//! Stores uploads under the static directory served at `/static`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::backend::media::{discard_local, MediaUploader, UploadedMedia};

pub struct LocalUploader {
    /// Directory files are copied into
    target_dir: PathBuf,
    /// URL prefix the target directory is served under
    url_prefix: String,
}

impl LocalUploader {
    pub fn new(target_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            target_dir: target_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    async fn store(&self, local_path: &Path) -> std::io::Result<UploadedMedia> {
        let file_name = local_path
            .file_name()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))?;

        tokio::fs::create_dir_all(&self.target_dir).await?;
        tokio::fs::copy(local_path, self.target_dir.join(file_name)).await?;

        Ok(UploadedMedia {
            url: format!(
                "{}/{}",
                self.url_prefix.trim_end_matches('/'),
                file_name.to_string_lossy()
            ),
        })
    }
}

#[async_trait]
impl MediaUploader for LocalUploader {
    async fn upload(&self, local_path: &Path) -> Option<UploadedMedia> {
        let result = self.store(local_path).await;
        discard_local(local_path).await;

        match result {
            Ok(media) => Some(media),
            Err(e) => {
                tracing::warn!("Local upload of {} failed: {}", local_path.display(), e);
                None
            }
        }
    }
}
