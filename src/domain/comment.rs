//! Comment domain model.

use serde::{Deserialize, Serialize};

use super::author::AuthorId;

record_id!(
    /// Unique identifier for a comment, assigned by the store.
    CommentId
);

/// A persisted comment left on an author's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: CommentId,
    pub text: String,
    pub author_id: AuthorId,
}

impl Comment {
    #[must_use]
    pub fn new(comment_id: CommentId, text: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            comment_id,
            text: text.into(),
            author_id,
        }
    }

    /// Returns true if the comment was left on the given author's page.
    #[must_use]
    pub fn belongs_to(&self, author_id: AuthorId) -> bool {
        self.author_id == author_id
    }
}

/// Fields needed to insert a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
    pub author_id: AuthorId,
}

impl NewComment {
    #[must_use]
    pub fn new(text: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            text: text.into(),
            author_id,
        }
    }
}
