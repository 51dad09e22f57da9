//! Common test utilities and fixtures for integration tests
//!
//! Provides a fully wired test application (in-memory messages backend,
//! tempdir-rooted local files backend) plus request/response helpers.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;

use chatvault_api::VaultState;
use chatvault_core::{ChatVault, LocalFiles, MemoryMessages};

/// Test application wired against the reference backends
pub struct TestApp {
    pub vault: ChatVault,
    router: Router,
    // Keeps the uploads directory alive for the duration of the test
    _uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = TempDir::new().expect("create uploads tempdir");
        let vault = ChatVault::new(
            Arc::new(MemoryMessages::new()),
            Arc::new(LocalFiles::new(uploads.path())),
        );
        let router = chatvault_api::routes().with_state(VaultState::new(vault.clone()));

        Self {
            vault,
            router,
            _uploads: uploads,
        }
    }

    /// A fresh clone of the router for `oneshot` calls
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build a request, optionally authenticated via `x-user-id` and with a
/// JSON body
pub fn request(
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id);
    }

    if let Some(b) = body {
        builder = builder.header(CONTENT_TYPE, "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Build a multipart file-upload request with a single `file` field
pub fn multipart_file_request(
    uri: &str,
    user_id: Option<&str>,
    filename: &str,
    content_type: &str,
    content: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "chatvault-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );

    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id);
    }

    builder.body(Body::from(body)).unwrap()
}

/// Parse a response body as JSON
pub async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
