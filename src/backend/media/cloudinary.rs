/**
 * Cloudinary Uploader
 *
 * Signed uploads to `POST {base_url}/v1_1/{cloud_name}/auto/upload`.
 *
 * The request is multipart with `file`, `api_key`, `timestamp`, `signature`
 * and `signature_algorithm=sha256`; the signature is the hex SHA-256 of
 * `timestamp=<ts><api_secret>`.
 */

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::backend::media::{discard_local, MediaUploader, UploadedMedia};

pub const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

/// Cloudinary account credentials
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// API origin, overridable for tests
    pub base_url: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    async fn send(&self, local_path: &Path) -> Result<UploadedMedia, String> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| format!("failed to read {}: {}", local_path.display(), e))?;
        let file_name = local_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.clone())
            .text("signature", sign(&timestamp, &self.config.api_secret))
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("status {}: {}", status, body));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response: {}", e))?;
        body.secure_url
            .or(body.url)
            .map(|url| UploadedMedia { url })
            .ok_or_else(|| "response carried no url".to_string())
    }
}

/// Hex SHA-256 of the signed parameters followed by the API secret.
fn sign(timestamp: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("timestamp={timestamp}{api_secret}").as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, local_path: &Path) -> Option<UploadedMedia> {
        let result = self.send(local_path).await;
        discard_local(local_path).await;

        match result {
            Ok(media) => {
                tracing::info!("File uploaded successfully: {}", media.url);
                Some(media)
            }
            Err(e) => {
                tracing::warn!("Cloudinary upload failed: {}", e);
                None
            }
        }
    }
}
