//! Book pages: create, update and delete.

use axum::Form;
use axum::extract::{Path, State};

use super::dto::{BookForm, CreateContext, UpdateContext};
use super::error::ApiErrorResponse;
use super::handlers::{AppState, render_page};
use super::notice::{Notice, Page, PendingNotices, RedirectWithNotices};
use super::view::Template;
use crate::domain::{Book, BookId, NewBook, RecordKind};
use crate::infrastructure::load_or_fail;

/// `GET /book/create`: the form offers every author.
///
/// # Errors
///
/// Returns 500 if the store or the presenter fails.
pub async fn create_book_form(
    State(state): State<AppState>,
    pending: PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let authors = state.store.list_authors().await?;
    let context = CreateContext {
        notices: pending.notices().to_vec(),
        kind: RecordKind::Book,
        authors,
    };
    render_page(&state, Template::Create, &context, &pending)
}

/// `POST /book/create`
///
/// # Errors
///
/// Returns 409 if `author_id` does not name an existing author.
pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let book = state
        .store
        .insert_book(NewBook::new(form.title, form.author_id))
        .await?;
    tracing::info!(book_id = %book.book_id, author_id = %book.author_id, "Book created");

    Ok(RedirectWithNotices::to("/").with_notice(Notice::success("Book created successfully!")))
}

/// `GET /book/update/{id}`
///
/// # Errors
///
/// Returns 404 if the book does not exist.
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(book_id): Path<BookId>,
    pending: PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let book = load_or_fail::<Book>(state.store.as_ref(), book_id).await?;
    let authors = state.store.list_authors().await?;
    let context = UpdateContext::Book {
        notices: pending.notices().to_vec(),
        book,
        authors,
    };
    render_page(&state, Template::Update, &context, &pending)
}

/// `POST /book/update/{id}`
///
/// # Errors
///
/// Returns 404 if the book does not exist and 409 if the new author does not.
pub async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<BookId>,
    Form(form): Form<BookForm>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let book = load_or_fail::<Book>(state.store.as_ref(), book_id).await?;
    state
        .store
        .update_book(book.with_details(form.title, form.author_id))
        .await?;
    tracing::info!(%book_id, "Book updated");

    Ok(RedirectWithNotices::to("/").with_notice(Notice::success("Book updated successfully!")))
}

/// `POST /book/delete/{id}`
///
/// # Errors
///
/// Returns 404 if the book does not exist.
pub async fn delete_book(
    State(state): State<AppState>,
    Path(book_id): Path<BookId>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let book = load_or_fail::<Book>(state.store.as_ref(), book_id).await?;
    state.store.delete_book(book.book_id).await?;
    tracing::info!(%book_id, "Book deleted");

    Ok(RedirectWithNotices::to("/").with_notice(Notice::success("Book deleted successfully!")))
}
