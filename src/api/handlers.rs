//! Shared handler plumbing: application state, page rendering and health.

use std::sync::Arc;

use axum::Json;
use serde::Serialize;

use super::error::ApiErrorResponse;
use super::notice::{Page, PendingNotices};
use super::view::{PresentationError, Presenter, Template};
use crate::infrastructure::LibraryStore;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Built once at startup and handed to every handler through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LibraryStore>,
    pub presenter: Arc<dyn Presenter>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LibraryStore>, presenter: Arc<dyn Presenter>) -> Self {
        Self { store, presenter }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("store", &"Arc<dyn LibraryStore>")
            .field("presenter", &"Arc<dyn Presenter>")
            .finish()
    }
}

/// Renders a template and marks the pending notices as displayed.
///
/// # Errors
///
/// Returns a 500 response if the context cannot be serialized or rendered.
pub fn render_page<C: Serialize>(
    state: &AppState,
    template: Template,
    context: &C,
    pending: &PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let context = serde_json::to_value(context)
        .map_err(|source| PresentationError::InvalidContext { template, source })?;
    let html = state.presenter.render(template, &context)?;
    Ok(Page::new(html).consuming(pending))
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
