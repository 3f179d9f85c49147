//! Store trait for the bookshelf records.
//!
//! All methods return boxed futures so the trait stays object-safe and the
//! backend can be chosen at runtime (`Arc<dyn LibraryStore>`). Every mutating
//! method is a complete unit of work: it either commits or leaves the store
//! untouched.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{
    Author, AuthorId, Book, BookId, Comment, CommentId, NewAuthor, NewBook, NewComment,
    RecordKind,
};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No record of the given kind has the identifier.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: i64 },

    /// The write would leave a dangling or orphaned reference.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl RepositoryError {
    /// Creates a not-found error for the given kind and identifier.
    #[must_use]
    pub fn not_found(kind: RecordKind, id: impl Into<i64>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Future returned by every store operation.
pub type StoreFuture<'a, T> = BoxFuture<'a, Result<T, RepositoryError>>;

// =============================================================================
// Library Store
// =============================================================================

/// Persistence collaborator for authors, books and comments.
///
/// Implementations enforce the reference rules themselves:
/// - books and comments may only reference an existing author
///   (`IntegrityViolation` otherwise);
/// - an author that still owns books or comments cannot be deleted
///   (`IntegrityViolation`, nothing removed).
///
/// Listings are ordered by identifier.
pub trait LibraryStore: Send + Sync {
    /// Lists every author.
    fn list_authors(&self) -> StoreFuture<'_, Vec<Author>>;

    /// Finds an author by identifier.
    fn find_author(&self, id: AuthorId) -> StoreFuture<'_, Option<Author>>;

    /// Inserts an author and returns it with its assigned identifier.
    fn insert_author(&self, author: NewAuthor) -> StoreFuture<'_, Author>;

    /// Inserts several authors as one unit of work, in order.
    ///
    /// Either every author is stored or none is.
    fn insert_authors(&self, authors: Vec<NewAuthor>) -> StoreFuture<'_, Vec<Author>>;

    /// Writes back every field of an existing author.
    ///
    /// Returns `NotFound` if the author no longer exists.
    fn update_author(&self, author: Author) -> StoreFuture<'_, ()>;

    /// Deletes an author that owns no books or comments.
    fn delete_author(&self, id: AuthorId) -> StoreFuture<'_, ()>;

    /// Lists the books written by an author.
    fn books_by_author(&self, id: AuthorId) -> StoreFuture<'_, Vec<Book>>;

    fn find_book(&self, id: BookId) -> StoreFuture<'_, Option<Book>>;

    fn insert_book(&self, book: NewBook) -> StoreFuture<'_, Book>;

    fn update_book(&self, book: Book) -> StoreFuture<'_, ()>;

    fn delete_book(&self, id: BookId) -> StoreFuture<'_, ()>;

    /// Lists the comments left on an author's page.
    fn comments_by_author(&self, id: AuthorId) -> StoreFuture<'_, Vec<Comment>>;

    fn find_comment(&self, id: CommentId) -> StoreFuture<'_, Option<Comment>>;

    fn insert_comment(&self, comment: NewComment) -> StoreFuture<'_, Comment>;

    fn delete_comment(&self, id: CommentId) -> StoreFuture<'_, ()>;
}

// =============================================================================
// Load-or-fail
// =============================================================================

/// A record kind that can be looked up by identifier.
pub trait Record: Sized + Send {
    /// Identifier type of the record.
    type Id: Copy + Into<i64> + Send;

    /// Kind tag used in not-found outcomes.
    const KIND: RecordKind;

    /// Finds the record in the store.
    fn find(store: &dyn LibraryStore, id: Self::Id) -> StoreFuture<'_, Option<Self>>;
}

impl Record for Author {
    type Id = AuthorId;
    const KIND: RecordKind = RecordKind::Author;

    fn find(store: &dyn LibraryStore, id: AuthorId) -> StoreFuture<'_, Option<Self>> {
        store.find_author(id)
    }
}

impl Record for Book {
    type Id = BookId;
    const KIND: RecordKind = RecordKind::Book;

    fn find(store: &dyn LibraryStore, id: BookId) -> StoreFuture<'_, Option<Self>> {
        store.find_book(id)
    }
}

impl Record for Comment {
    type Id = CommentId;
    const KIND: RecordKind = RecordKind::Comment;

    fn find(store: &dyn LibraryStore, id: CommentId) -> StoreFuture<'_, Option<Self>> {
        store.find_comment(id)
    }
}

/// Outcome of looking a record up by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound { kind: RecordKind, id: i64 },
}

impl<T> Lookup<T> {
    /// Returns the record, or a `NotFound` error carrying the kind and identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for the `NotFound` outcome.
    pub fn found(self) -> Result<T, RepositoryError> {
        match self {
            Self::Found(record) => Ok(record),
            Self::NotFound { kind, id } => Err(RepositoryError::NotFound { kind, id }),
        }
    }

    /// Returns true if the record was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Looks a record up and tags the outcome.
///
/// # Errors
///
/// Propagates store failures; a missing record is not an error here.
pub async fn lookup<R: Record>(
    store: &dyn LibraryStore,
    id: R::Id,
) -> Result<Lookup<R>, RepositoryError> {
    let record = R::find(store, id).await?;
    Ok(record.map_or_else(
        || Lookup::NotFound {
            kind: R::KIND,
            id: id.into(),
        },
        Lookup::Found,
    ))
}

/// Loads a record or fails with `RepositoryError::NotFound`.
///
/// # Errors
///
/// Returns `NotFound` when the record is absent, or the store failure.
pub async fn load_or_fail<R: Record>(
    store: &dyn LibraryStore,
    id: R::Id,
) -> Result<R, RepositoryError> {
    lookup::<R>(store, id).await?.found()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStore;
    use rstest::rstest;

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::not_found(RecordKind::Author, AuthorId::new(12));
        assert_eq!(format!("{error}"), "Author 12 not found");

        let error = RepositoryError::IntegrityViolation("author 3 owns books".to_string());
        assert_eq!(
            format!("{error}"),
            "Integrity violation: author 3 owns books"
        );

        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");
    }

    #[rstest]
    fn test_lookup_found_returns_record() {
        let lookup = Lookup::Found(5);
        assert!(lookup.is_found());
        assert_eq!(lookup.found(), Ok(5));
    }

    #[rstest]
    fn test_lookup_not_found_returns_error() {
        let lookup: Lookup<Book> = Lookup::NotFound {
            kind: RecordKind::Book,
            id: 4,
        };
        assert!(!lookup.is_found());
        assert_eq!(
            lookup.found(),
            Err(RepositoryError::NotFound {
                kind: RecordKind::Book,
                id: 4
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_lookup_tags_missing_record_with_kind() {
        let store = InMemoryStore::new();

        let outcome = lookup::<Comment>(&store, CommentId::new(8)).await.unwrap();

        assert_eq!(
            outcome,
            Lookup::NotFound {
                kind: RecordKind::Comment,
                id: 8
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_load_or_fail_returns_existing_record() {
        let store = InMemoryStore::new();
        let author = store.insert_author(NewAuthor::new("Ursula")).await.unwrap();

        let loaded = load_or_fail::<Author>(&store, author.author_id)
            .await
            .unwrap();

        assert_eq!(loaded, author);
    }

    #[rstest]
    #[tokio::test]
    async fn test_load_or_fail_missing_record_is_not_found() {
        let store = InMemoryStore::new();

        let result = load_or_fail::<Book>(&store, BookId::new(1)).await;

        assert_eq!(
            result,
            Err(RepositoryError::not_found(RecordKind::Book, BookId::new(1)))
        );
    }
}
