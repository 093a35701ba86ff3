#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use http::{Method, Request};
use soundserver::db::{self, SqliteSoundStore};
use soundserver::models::sound::{AudioUpload, Sound, SoundKind};
use soundserver::routes;
use soundserver::service::SoundService;
use soundserver::state::AppState;
use soundserver::storage::local::temp_storage_path;
use soundserver::storage::{BlobError, BlobStore, LocalBlobStore};

pub const BOUNDARY: &str = "----soundserver-test-boundary";

/// Test server that owns an in-memory SQLite store and a scratch blob
/// directory. Each instance is isolated, so tests can run in parallel.
pub struct TestServer {
    pub state: AppState,
    pub store: SqliteSoundStore,
    pub storage_path: PathBuf,
}

impl TestServer {
    /// Create a new TestServer backed by the local blob store.
    pub async fn new() -> Self {
        let storage_path = temp_storage_path();
        let blobs = LocalBlobStore::new(storage_path.clone());
        blobs.prepare().await.expect("failed to create storage dirs");
        Self::with_blobs(Arc::new(blobs), storage_path).await
    }

    /// Create a TestServer whose object store fails every call.
    pub async fn with_broken_blobs() -> Self {
        Self::with_blobs(Arc::new(BrokenBlobStore), temp_storage_path()).await
    }

    async fn with_blobs(blobs: Arc<dyn BlobStore>, storage_path: PathBuf) -> Self {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("failed to create test pool");
        let store = SqliteSoundStore::new(pool);

        let state = AppState {
            sounds: SoundService::new(Arc::new(store.clone()), blobs),
            cdn_root: Some(storage_path.clone()),
        };

        Self {
            state,
            store,
            storage_path,
        }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }
}

/// Object store that is permanently unavailable.
pub struct BrokenBlobStore;

#[async_trait]
impl BlobStore for BrokenBlobStore {
    async fn upload(
        &self,
        _kind: SoundKind,
        _key: &str,
        _audio: &AudioUpload,
    ) -> Result<String, BlobError> {
        Err(BlobError::Backend("bucket unavailable".to_string()))
    }

    async fn delete(&self, _url: &str) -> Result<(), BlobError> {
        Err(BlobError::Backend("bucket unavailable".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Request builder helpers
// ---------------------------------------------------------------------------

/// A file part for `multipart_request`.
pub struct FilePart<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

pub fn mp3(filename: &str) -> FilePart<'_> {
    FilePart {
        filename,
        content_type: "audio/mpeg",
        bytes: b"ID3\x03\x00fake mp3 payload",
    }
}

/// Encode text fields and an optional file as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(file) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a `multipart/form-data` request.
pub fn multipart_request(
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap()
}

/// Build a request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Build a request with no body.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// The standard "Rain" fixture fields.
pub fn rain_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Rain"),
        ("type", "background"),
        ("tier", "free"),
        ("duration", "120"),
        ("description", "soft rain on a window"),
    ]
}

/// Parse a response body into a `serde_json::Value`.
pub async fn parse_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse a response body into a `Sound`.
pub async fn parse_sound(response: axum::response::Response) -> Sound {
    serde_json::from_value(parse_body(response).await).unwrap()
}

/// Creates a router the way the bootstrap does, over a fresh test server.
pub async fn test_app() -> axum::Router {
    TestServer::new().await.router()
}
