//! API error handling.
//!
//! Failures are answered with a small HTML error page. Internal details are
//! logged, never sent to the client.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use super::view::{PresentationError, escape_html};
use crate::infrastructure::RepositoryError;

/// Error response carrying the HTTP status and a client-safe message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl ApiErrorResponse {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict response for rejected references.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal error occurred",
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let reason = self.status.canonical_reason().unwrap_or("Error");
        let page = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{code} {reason}</title></head>\n\
             <body>\n<h1>{code} {reason}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Back to authors</a></p>\n</body>\n</html>\n",
            code = self.status.as_u16(),
            message = escape_html(&self.message),
        );
        (self.status, Html(page)).into_response()
    }
}

impl From<RepositoryError> for ApiErrorResponse {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { kind, id } => Self::not_found(format!("{kind} {id} not found")),
            RepositoryError::IntegrityViolation(reason) => {
                tracing::warn!(%reason, "Rejected write");
                Self::conflict(
                    "The change was rejected because it would break a reference between records",
                )
            }
            RepositoryError::DatabaseError(ref details) => {
                tracing::error!(%details, "Database error");
                Self::internal_error()
            }
        }
    }
}

impl From<PresentationError> for ApiErrorResponse {
    fn from(error: PresentationError) -> Self {
        tracing::error!(%error, "Rendering failed");
        Self::internal_error()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordKind;
    use rstest::rstest;

    #[rstest]
    #[case(RepositoryError::not_found(RecordKind::Author, 3), StatusCode::NOT_FOUND)]
    #[case(
        RepositoryError::IntegrityViolation("FOREIGN KEY constraint failed".to_string()),
        StatusCode::CONFLICT
    )]
    #[case(
        RepositoryError::DatabaseError("pool timed out".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_repository_error_status(#[case] error: RepositoryError, #[case] expected: StatusCode) {
        assert_eq!(ApiErrorResponse::from(error).status, expected);
    }

    #[rstest]
    fn test_not_found_message_names_record() {
        let response = ApiErrorResponse::from(RepositoryError::not_found(RecordKind::Book, 9));
        assert_eq!(response.message, "Book 9 not found");
    }

    #[rstest]
    fn test_database_error_details_are_hidden() {
        let response = ApiErrorResponse::from(RepositoryError::DatabaseError(
            "password authentication failed".to_string(),
        ));
        assert!(!response.message.contains("password"));
    }

    #[rstest]
    fn test_into_response_renders_html_page() {
        let response = ApiErrorResponse::not_found("Author 1 not found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(axum::http::header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }
}
