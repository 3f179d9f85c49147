//! Common test helpers for endpoint tests.
//!
//! # Note
//!
//! Each integration test file is compiled as its own crate, so helpers used
//! by only one of them would otherwise raise dead code warnings.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bookshelf::api::{AppState, HtmlPresenter, create_router};
use bookshelf::infrastructure::{DatabaseBackend, LibraryStore, StoreConfig, StoreFactory};

// =============================================================================
// Application Helpers
// =============================================================================

/// Backends exercised by the endpoint tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestBackend {
    Memory,
    SqliteInMemory,
}

/// Creates a store of the given backend with an empty schema.
pub async fn create_store(backend: TestBackend) -> Arc<dyn LibraryStore> {
    let config = match backend {
        TestBackend::Memory => StoreConfig::builder()
            .backend(DatabaseBackend::InMemory)
            .build(),
        TestBackend::SqliteInMemory => StoreConfig::builder()
            .backend(DatabaseBackend::Sqlite)
            .database_url("sqlite::memory:")
            .build(),
    }
    .expect("valid test configuration");

    StoreFactory::new(config)
        .create()
        .await
        .expect("Failed to create test store")
}

/// Creates a router over the given store with the HTML presenter.
pub fn create_test_router(store: Arc<dyn LibraryStore>) -> Router {
    create_router(AppState::new(store, Arc::new(HtmlPresenter::new())))
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Collected response parts the tests inspect.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Returns the `name=value` pair of the `Set-Cookie` header, if any.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie
            .as_deref()
            .and_then(|cookie| cookie.split(';').next())
            .map(str::to_string)
    }
}

async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let header_text = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let status = response.status();
    let location = header_text(header::LOCATION);
    let set_cookie = header_text(header::SET_COOKIE);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    TestResponse {
        status,
        location,
        set_cookie,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// Sends a GET request, optionally with a `Cookie` header.
pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

/// Sends a POST request with a URL-encoded form body.
pub async fn post_form(router: &Router, uri: &str, form: &str) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(router, request).await
}
