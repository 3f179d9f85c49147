//! Book domain model.

use serde::{Deserialize, Serialize};

use super::author::AuthorId;

record_id!(
    /// Unique identifier for a book, assigned by the store.
    BookId
);

/// A persisted book. Every book references exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author_id: AuthorId,
}

impl Book {
    #[must_use]
    pub fn new(book_id: BookId, title: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            book_id,
            title: title.into(),
            author_id,
        }
    }

    /// Returns the book with its title and author reference replaced.
    #[must_use]
    pub fn with_details(self, title: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            title: title.into(),
            author_id,
            ..self
        }
    }
}

/// Fields needed to insert a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_id: AuthorId,
}

impl NewBook {
    #[must_use]
    pub fn new(title: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            title: title.into(),
            author_id,
        }
    }
}
