//! Comments on an author's page.

use axum::Form;
use axum::extract::{Path, State};

use super::dto::CommentForm;
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use super::notice::{Notice, RedirectWithNotices};
use crate::domain::{Author, AuthorId, Comment, CommentId, NewComment, RecordKind};
use crate::infrastructure::{RepositoryError, load_or_fail};

/// `POST /author/{id}/comment`
///
/// # Errors
///
/// Returns 404 if the author does not exist.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(author_id): Path<AuthorId>,
    Form(form): Form<CommentForm>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let author = load_or_fail::<Author>(state.store.as_ref(), author_id).await?;
    let comment = state
        .store
        .insert_comment(NewComment::new(form.comment, author.author_id))
        .await?;
    tracing::info!(comment_id = %comment.comment_id, %author_id, "Comment added");

    Ok(RedirectWithNotices::to(format!("/author/{author_id}"))
        .with_notice(Notice::success("Comment added successfully!")))
}

/// `POST /comment/delete/{comment_id}/{author_id}`
///
/// The comment must belong to the author in the path; otherwise it is
/// reported missing and kept.
///
/// # Errors
///
/// Returns 404 if no comment with this identifier belongs to the author.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((comment_id, author_id)): Path<(CommentId, AuthorId)>,
) -> Result<RedirectWithNotices, ApiErrorResponse> {
    let comment = load_or_fail::<Comment>(state.store.as_ref(), comment_id).await?;
    if !comment.belongs_to(author_id) {
        tracing::debug!(%comment_id, %author_id, owner = %comment.author_id, "Comment author mismatch");
        return Err(RepositoryError::not_found(RecordKind::Comment, comment_id).into());
    }

    state.store.delete_comment(comment.comment_id).await?;
    tracing::info!(%comment_id, %author_id, "Comment deleted");

    Ok(RedirectWithNotices::to(format!("/author/{}", comment.author_id))
        .with_notice(Notice::success("Comment deleted successfully!")))
}
