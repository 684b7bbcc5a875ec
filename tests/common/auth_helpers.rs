//! Authentication test helpers
//!
//! Builds the full router against the in-memory store and a local uploader
//! rooted in a temporary directory, and provides request/response helpers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::Barrier;
use tower::ServiceExt;
use uuid::Uuid;

use vidauth::backend::auth::memory::InMemoryCredentialStore;
use vidauth::backend::auth::users::{CredentialStore, NewUser, StoreError, User};
use vidauth::backend::media::LocalUploader;
use vidauth::backend::routes::create_router;
use vidauth::backend::server::init::LOCAL_UPLOAD_PREFIX;
use vidauth::backend::server::{AppState, ServerConfig};
use vidauth::shared::TokenConfig;

pub const PASSWORD: &str = "Abcdef1!";
pub const AVATAR_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake avatar";

/// Application under test
pub struct TestApp {
    pub router: Router,
    pub store: InMemoryCredentialStore,
    pub public_dir: PathBuf,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

/// Buffered response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    /// Parsed JSON body, `Value::Null` when the body is not JSON
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryCredentialStore::new();
        Self::with_store(store.clone(), Arc::new(store))
    }

    /// App whose store can hold `find_by_id` callers at a barrier
    pub fn lockstep() -> (Self, Arc<LockstepStore>) {
        let store = InMemoryCredentialStore::new();
        let lockstep = Arc::new(LockstepStore::new(store.clone()));
        (Self::with_store(store, lockstep.clone()), lockstep)
    }

    fn with_store(store: InMemoryCredentialStore, backend: Arc<dyn CredentialStore>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let tokens = TokenConfig::builder()
            .access_secret("test-access-secret")
            .refresh_secret("test-refresh-secret")
            .build()
            .expect("Failed to build token config");

        let mut config = ServerConfig::new(tokens);
        config.public_dir = dir.path().join("public");
        config.upload_dir = dir.path().join("temp");
        config.bcrypt_cost = 4;

        let media = Arc::new(LocalUploader::new(
            config.public_dir.join("uploads"),
            LOCAL_UPLOAD_PREFIX,
        ));
        let router = create_router(AppState::new(&config, backend, media));

        Self {
            router,
            store,
            public_dir: config.public_dir,
            upload_dir: config.upload_dir,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    /// Register `username` with a valid form and an avatar
    pub async fn register(&self, username: &str) -> TestResponse {
        let form = MultipartBody::new()
            .text("fullName", "Test User")
            .text("email", &format!("{username}@example.com"))
            .text("username", username)
            .text("password", PASSWORD)
            .file("avatar", "avatar.png", "image/png", AVATAR_BYTES);
        self.send(form.into_request("/api/v1/users/register")).await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(json_request(
            "/api/v1/users/login",
            &serde_json::json!({ "username": username, "password": password }),
        ))
        .await
    }

    /// Register and log in, returning the login response
    pub async fn signed_in(&self, username: &str) -> TestResponse {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::CREATED, "body: {}", registered.body);
        let login = self.login(username, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "body: {}", login.body);
        login
    }
}

/// In-memory store that can make the next `n` `find_by_id` callers wait
/// for each other, so they all observe the same row before any writes.
pub struct LockstepStore {
    inner: InMemoryCredentialStore,
    gated: AtomicUsize,
    barrier: Barrier,
}

impl LockstepStore {
    const PARTIES: usize = 2;

    fn new(inner: InMemoryCredentialStore) -> Self {
        Self {
            inner,
            gated: AtomicUsize::new(0),
            barrier: Barrier::new(Self::PARTIES),
        }
    }

    /// Gate the next two `find_by_id` calls
    pub fn arm(&self) {
        self.gated.store(Self::PARTIES, Ordering::SeqCst);
    }

    fn take_gate(&self) -> bool {
        self.gated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl CredentialStore for LockstepStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = self.inner.find_by_id(id).await?;
        if self.take_gate() {
            self.barrier.wait().await;
        }
        Ok(user)
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        self.inner.find_by_username_or_email(username, email).await
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.inner.create(new_user).await
    }

    async fn update_refresh_token(&self, id: Uuid, token: Option<&str>) -> Result<bool, StoreError> {
        self.inner.update_refresh_token(id, token).await
    }

    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        expected: &str,
        new: &str,
    ) -> Result<bool, StoreError> {
        self.inner.rotate_refresh_token(id, expected, new).await
    }
}

impl TestResponse {
    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// The `Set-Cookie` value for `name`
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    pub fn access_token(&self) -> String {
        self.body["data"]["accessToken"]
            .as_str()
            .expect("accessToken in body")
            .to_string()
    }

    pub fn refresh_token(&self) -> String {
        self.body["data"]["refreshToken"]
            .as_str()
            .expect("refreshToken in body")
            .to_string()
    }
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Minimal `multipart/form-data` encoder
pub struct MultipartBody {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("----vidauth-test-{}", uuid::Uuid::new_v4().simple()),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.buf))
            .expect("Failed to build request")
    }
}

/// Number of entries in a directory; 0 when it does not exist
pub fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
