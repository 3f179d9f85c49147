//! Route configuration.
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | / | `list_authors` |
//! | GET, POST | /author/create | `create_author_form`, `create_author` |
//! | GET | /author/{id} | `read_author` |
//! | GET, POST | /author/update/{id} | `update_author_form`, `update_author` |
//! | POST | /author/delete/{id} | `delete_author` |
//! | POST | /author/{id}/comment | `add_comment` |
//! | GET, POST | /book/create | `create_book_form`, `create_book` |
//! | GET, POST | /book/update/{id} | `update_book_form`, `update_book` |
//! | POST | /book/delete/{id} | `delete_book` |
//! | POST | /comment/delete/{comment_id}/{author_id} | `delete_comment` |
//! | GET | /health | `health_check` |

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::authors::{
    create_author, create_author_form, delete_author, list_authors, read_author, update_author,
    update_author_form,
};
use super::books::{create_book, create_book_form, delete_book, update_book, update_book_form};
use super::comments::{add_comment, delete_comment};
use super::handlers::{AppState, health_check};

/// Creates the router with every page and the HTTP trace layer.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Authors
        .route("/", get(list_authors))
        .route("/author/create", get(create_author_form).post(create_author))
        .route("/author/{id}", get(read_author))
        .route(
            "/author/update/{id}",
            get(update_author_form).post(update_author),
        )
        .route("/author/delete/{id}", post(delete_author))
        // Books
        .route("/book/create", get(create_book_form).post(create_book))
        .route("/book/update/{id}", get(update_book_form).post(update_book))
        .route("/book/delete/{id}", post(delete_book))
        // Comments
        .route("/author/{id}/comment", post(add_comment))
        .route(
            "/comment/delete/{comment_id}/{author_id}",
            post(delete_comment),
        )
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::api::HtmlPresenter;
    use crate::infrastructure::InMemoryStore;

    fn router() -> Router {
        create_router(AppState::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(HtmlPresenter::new()),
        ))
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check_reports_version() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[rstest]
    #[case("/author/create")]
    #[case("/book/create")]
    #[case("/")]
    #[tokio::test]
    async fn test_form_pages_render(#[case] uri: &str) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[case("/author/abc")]
    #[case("/book/update/x")]
    #[tokio::test]
    async fn test_non_integer_identifier_is_bad_request(#[case] uri: &str) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_requires_post() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/author/delete/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
