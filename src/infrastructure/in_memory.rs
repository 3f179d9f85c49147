//! In-memory store implementation.
//!
//! Suitable for development and tests. Tables live in ordered maps behind a
//! single `tokio::sync::RwLock`, so every mutation is applied atomically.
//! The same reference rules as the SQL schema are enforced: children must
//! point at an existing author and authors with children cannot be deleted.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{
    Author, AuthorId, Book, BookId, Comment, CommentId, NewAuthor, NewBook, NewComment,
    RecordKind,
};
use crate::infrastructure::{LibraryStore, RepositoryError, StoreFuture};

// =============================================================================
// Tables
// =============================================================================

/// Identifier sequences and rows of every table.
///
/// Sequences only move forward, so identifiers are never reused after a delete.
#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<AuthorId, Author>,
    books: BTreeMap<BookId, Book>,
    comments: BTreeMap<CommentId, Comment>,
    last_author_id: i64,
    last_book_id: i64,
    last_comment_id: i64,
}

impl Tables {
    fn require_author(
        &self,
        author_id: AuthorId,
        referrer: RecordKind,
    ) -> Result<(), RepositoryError> {
        if self.authors.contains_key(&author_id) {
            Ok(())
        } else {
            Err(RepositoryError::IntegrityViolation(format!(
                "{referrer} references missing author {author_id}"
            )))
        }
    }

    fn owns_records(&self, author_id: AuthorId) -> bool {
        self.books.values().any(|book| book.author_id == author_id)
            || self
                .comments
                .values()
                .any(|comment| comment.author_id == author_id)
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// In-memory implementation of `LibraryStore`.
///
/// Cloning the store shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl LibraryStore for InMemoryStore {
    fn list_authors(&self) -> StoreFuture<'_, Vec<Author>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            Ok(guard.authors.values().cloned().collect())
        })
    }

    fn find_author(&self, id: AuthorId) -> StoreFuture<'_, Option<Author>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            Ok(guard.authors.get(&id).cloned())
        })
    }

    fn insert_author(&self, author: NewAuthor) -> StoreFuture<'_, Author> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            guard.last_author_id += 1;
            let author_id = AuthorId::new(guard.last_author_id);
            let author = Author::new(author_id, author.name);
            guard.authors.insert(author_id, author.clone());
            Ok(author)
        })
    }

    fn insert_authors(&self, authors: Vec<NewAuthor>) -> StoreFuture<'_, Vec<Author>> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            let inserted = authors
                .into_iter()
                .map(|author| {
                    guard.last_author_id += 1;
                    let author = Author::new(AuthorId::new(guard.last_author_id), author.name);
                    guard.authors.insert(author.author_id, author.clone());
                    author
                })
                .collect();
            Ok(inserted)
        })
    }

    fn update_author(&self, author: Author) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            let Some(existing) = guard.authors.get_mut(&author.author_id) else {
                return Err(RepositoryError::not_found(
                    RecordKind::Author,
                    author.author_id,
                ));
            };
            *existing = author;
            Ok(())
        })
    }

    fn delete_author(&self, id: AuthorId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            if !guard.authors.contains_key(&id) {
                return Err(RepositoryError::not_found(RecordKind::Author, id));
            }
            if guard.owns_records(id) {
                return Err(RepositoryError::IntegrityViolation(format!(
                    "author {id} still owns books or comments"
                )));
            }
            guard.authors.remove(&id);
            Ok(())
        })
    }

    fn books_by_author(&self, id: AuthorId) -> StoreFuture<'_, Vec<Book>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            Ok(guard
                .books
                .values()
                .filter(|book| book.author_id == id)
                .cloned()
                .collect())
        })
    }

    fn find_book(&self, id: BookId) -> StoreFuture<'_, Option<Book>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            Ok(guard.books.get(&id).cloned())
        })
    }

    fn insert_book(&self, book: NewBook) -> StoreFuture<'_, Book> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            guard.require_author(book.author_id, RecordKind::Book)?;
            guard.last_book_id += 1;
            let book_id = BookId::new(guard.last_book_id);
            let book = Book::new(book_id, book.title, book.author_id);
            guard.books.insert(book_id, book.clone());
            Ok(book)
        })
    }

    fn update_book(&self, book: Book) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            if !guard.books.contains_key(&book.book_id) {
                return Err(RepositoryError::not_found(RecordKind::Book, book.book_id));
            }
            guard.require_author(book.author_id, RecordKind::Book)?;
            guard.books.insert(book.book_id, book);
            Ok(())
        })
    }

    fn delete_book(&self, id: BookId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            guard
                .books
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| RepositoryError::not_found(RecordKind::Book, id))
        })
    }

    fn comments_by_author(&self, id: AuthorId) -> StoreFuture<'_, Vec<Comment>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            Ok(guard
                .comments
                .values()
                .filter(|comment| comment.author_id == id)
                .cloned()
                .collect())
        })
    }

    fn find_comment(&self, id: CommentId) -> StoreFuture<'_, Option<Comment>> {
        Box::pin(async move {
            let guard = self.tables.read().await;
            Ok(guard.comments.get(&id).cloned())
        })
    }

    fn insert_comment(&self, comment: NewComment) -> StoreFuture<'_, Comment> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            guard.require_author(comment.author_id, RecordKind::Comment)?;
            guard.last_comment_id += 1;
            let comment_id = CommentId::new(guard.last_comment_id);
            let comment = Comment::new(comment_id, comment.text, comment.author_id);
            guard.comments.insert(comment_id, comment.clone());
            Ok(comment)
        })
    }

    fn delete_comment(&self, id: CommentId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut guard = self.tables.write().await;
            guard
                .comments
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| RepositoryError::not_found(RecordKind::Comment, id))
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
