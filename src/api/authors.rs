//! Author pages: listing, detail, create, update and delete.

use axum::Form;
use axum::extract::{Path, State};

use super::dto::{AuthorDetailContext, AuthorForm, CreateContext, ListingContext, UpdateContext};
use super::error::ApiErrorResponse;
use super::handlers::{AppState, render_page};
use super::notice::{Notice, Page, PendingNotices, RedirectWithNotices};
use super::view::Template;
use crate::domain::{Author, AuthorDetail, AuthorId, NewAuthor, RecordKind};
use crate::infrastructure::load_or_fail;

/// `GET /`: lists every author.
///
/// # Errors
///
/// Returns 500 if the store or the presenter fails.
pub async fn list_authors(
    State(state): State<AppState>,
    pending: PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let authors = state.store.list_authors().await?;
    let context = ListingContext {
        notices: pending.notices().to_vec(),
        authors,
    };
    render_page(&state, Template::Read, &context, &pending)
}

/// `GET /author/create`
///
/// # Errors
///
/// Returns 500 if the presenter fails.
pub async fn create_author_form(
    State(state): State<AppState>,
    pending: PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let context = CreateContext {
        notices: pending.notices().to_vec(),
        kind: RecordKind::Author,
        authors: Vec::new(),
    };
    render_page(&state, Template::Create, &context, &pending)
}

/// `POST /author/create`
///
/// # Errors
///
/// Returns 500 if the insert fails.
pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let author = state.store.insert_author(NewAuthor::new(form.name)).await?;
    tracing::info!(author_id = %author.author_id, "Author created");

    Ok(RedirectWithNotices::to("/").with_notice(Notice::success("Author created successfully!")))
}

/// `GET /author/{id}`: the author with its books and comments.
///
/// # Errors
///
/// Returns 404 if the author does not exist.
pub async fn read_author(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
    pending: PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let author = load_or_fail::<Author>(state.store.as_ref(), author_id).await?;
    let books = state.store.books_by_author(author_id).await?;
    let comments = state.store.comments_by_author(author_id).await?;

    let context = AuthorDetailContext {
        notices: pending.notices().to_vec(),
        detail: AuthorDetail {
            author,
            books,
            comments,
        },
    };
    render_page(&state, Template::AuthorDetail, &context, &pending)
}

/// `GET /author/update/{id}`
///
/// # Errors
///
/// Returns 404 if the author does not exist.
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
    pending: PendingNotices,
) -> Result<Page, ApiErrorResponse> {
    let author = load_or_fail::<Author>(state.store.as_ref(), author_id).await?;
    let context = UpdateContext::Author {
        notices: pending.notices().to_vec(),
        author,
    };
    render_page(&state, Template::Update, &context, &pending)
}

/// `POST /author/update/{id}`: replaces the name; last writer wins.
///
/// # Errors
///
/// Returns 404 if the author does not exist.
pub async fn update_author(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
    Form(form): Form<AuthorForm>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let author = load_or_fail::<Author>(state.store.as_ref(), author_id).await?;
    state.store.update_author(author.with_name(form.name)).await?;
    tracing::info!(%author_id, "Author updated");

    Ok(RedirectWithNotices::to("/").with_notice(Notice::success("Author updated successfully!")))
}

/// `POST /author/delete/{id}`
///
/// # Errors
///
/// Returns 404 if the author does not exist and 409 if it still owns books
/// or comments.
pub async fn delete_author(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let author = load_or_fail::<Author>(state.store.as_ref(), author_id).await?;
    state.store.delete_author(author.author_id).await?;
    tracing::info!(%author_id, "Author deleted");

    Ok(RedirectWithNotices::to("/").with_notice(Notice::success("Author deleted successfully!")))
}
