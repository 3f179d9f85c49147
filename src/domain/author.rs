//! Author domain model.
//!
//! An author owns two collections: the books they wrote and the comments
//! left on their page. Both are navigated through the store rather than
//! embedded in the record.

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::comment::Comment;

record_id!(
    /// Unique identifier for an author, assigned by the store.
    AuthorId
);

/// A persisted author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Identifier assigned on insert.
    pub author_id: AuthorId,
    /// Display name of the author.
    pub name: String,
}

impl Author {
    /// Creates an author value from stored columns.
    #[must_use]
    pub fn new(author_id: AuthorId, name: impl Into<String>) -> Self {
        Self {
            author_id,
            name: name.into(),
        }
    }

    /// Returns the author with the name replaced.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }
}

/// Fields needed to insert a new author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
}

impl NewAuthor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An author together with the records it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_author_id_round_trips_raw_value() {
        let author_id = AuthorId::new(42);
        assert_eq!(author_id.get(), 42);
        assert_eq!(i64::from(author_id), 42);
        assert_eq!(author_id.to_string(), "42");
    }

    #[rstest]
    fn test_with_name_keeps_identifier() {
        let author = Author::new(AuthorId::new(7), "Jane Doe").with_name("Jane Roe");
        assert_eq!(author.author_id, AuthorId::new(7));
        assert_eq!(author.name, "Jane Roe");
    }

    #[rstest]
    fn test_author_serializes_identifier_transparently() {
        let author = Author::new(AuthorId::new(3), "Frank Herbert");
        let value = serde_json::to_value(&author).unwrap();
        assert_eq!(value["author_id"], 3);
        assert_eq!(value["name"], "Frank Herbert");
    }
}
