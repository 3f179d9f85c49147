//! Relational store implementation.
//!
//! One implementation serves the three supported backends (SQLite, `PostgreSQL`
//! and `MySQL`) through sqlx's `Any` driver. Backend differences are confined
//! to [`Dialect`]: the table definitions, the bind marker syntax and how the
//! identifier of an inserted row is obtained.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE author (id <auto id>, name VARCHAR(100) NOT NULL);
//! CREATE TABLE book (
//!     id <auto id>,
//!     title VARCHAR(200) NOT NULL,
//!     author_id <bigint> NOT NULL REFERENCES author (id) <on delete>
//! );
//! CREATE TABLE comment (
//!     id <auto id>,
//!     text TEXT NOT NULL,
//!     author_id <bigint> NOT NULL REFERENCES author (id) <on delete>
//! );
//! ```
//!
//! `PostgreSQL` and `MySQL` declare `ON DELETE RESTRICT`. SQLite keeps the
//! default `NO ACTION`, which rejects the same deletes but reports them as a
//! foreign key failure rather than a trigger failure.
//!
//! Every mutation runs in its own transaction and commits once; a failed
//! statement drops the transaction, which rolls it back.

use std::borrow::Cow;
use std::time::Duration;

use sqlx::any::{AnyArguments, AnyPoolOptions};
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, AnyPool, Row};

use crate::domain::{
    Author, AuthorId, Book, BookId, Comment, CommentId, NewAuthor, NewBook, NewComment,
    RecordKind,
};
use crate::infrastructure::{LibraryStore, RepositoryError, StoreFuture};

// =============================================================================
// Dialect
// =============================================================================

const SQLITE_SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS author (\
        id INTEGER PRIMARY KEY AUTOINCREMENT, \
        name VARCHAR(100) NOT NULL)",
    "CREATE TABLE IF NOT EXISTS book (\
        id INTEGER PRIMARY KEY AUTOINCREMENT, \
        title VARCHAR(200) NOT NULL, \
        author_id INTEGER NOT NULL REFERENCES author (id))",
    "CREATE TABLE IF NOT EXISTS comment (\
        id INTEGER PRIMARY KEY AUTOINCREMENT, \
        text TEXT NOT NULL, \
        author_id INTEGER NOT NULL REFERENCES author (id))",
];

const POSTGRES_SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS author (\
        id BIGSERIAL PRIMARY KEY, \
        name VARCHAR(100) NOT NULL)",
    "CREATE TABLE IF NOT EXISTS book (\
        id BIGSERIAL PRIMARY KEY, \
        title VARCHAR(200) NOT NULL, \
        author_id BIGINT NOT NULL REFERENCES author (id) ON DELETE RESTRICT)",
    "CREATE TABLE IF NOT EXISTS comment (\
        id BIGSERIAL PRIMARY KEY, \
        text TEXT NOT NULL, \
        author_id BIGINT NOT NULL REFERENCES author (id) ON DELETE RESTRICT)",
];

// The Any driver reads MySQL TEXT columns as blobs, so comment text is a VARCHAR.
const MYSQL_SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS author (\
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
        name VARCHAR(100) NOT NULL) ENGINE=InnoDB",
    "CREATE TABLE IF NOT EXISTS book (\
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
        title VARCHAR(200) NOT NULL, \
        author_id BIGINT NOT NULL, \
        CONSTRAINT fk_book_author FOREIGN KEY (author_id) \
            REFERENCES author (id) ON DELETE RESTRICT) ENGINE=InnoDB",
    "CREATE TABLE IF NOT EXISTS comment (\
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
        text VARCHAR(4096) NOT NULL, \
        author_id BIGINT NOT NULL, \
        CONSTRAINT fk_comment_author FOREIGN KEY (author_id) \
            REFERENCES author (id) ON DELETE RESTRICT) ENGINE=InnoDB",
];

/// SQL flavor spoken by the connected database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
    MySql,
}

impl Dialect {
    /// Returns the `CREATE TABLE IF NOT EXISTS` statements, parents first.
    #[must_use]
    pub const fn schema(self) -> [&'static str; 3] {
        match self {
            Self::Sqlite => SQLITE_SCHEMA,
            Self::Postgres => POSTGRES_SCHEMA,
            Self::MySql => MYSQL_SCHEMA,
        }
    }

    /// Rewrites `?` bind markers into the dialect's syntax.
    ///
    /// Queries in this module are written with `?`; `PostgreSQL` needs `$1`, `$2`, ...
    #[must_use]
    pub fn bind_markers(self, query: &str) -> Cow<'_, str> {
        match self {
            Self::Sqlite | Self::MySql => Cow::Borrowed(query),
            Self::Postgres => {
                let mut rewritten = String::with_capacity(query.len() + 8);
                let mut position = 0;
                for character in query.chars() {
                    if character == '?' {
                        position += 1;
                        rewritten.push('$');
                        rewritten.push_str(&position.to_string());
                    } else {
                        rewritten.push(character);
                    }
                }
                Cow::Owned(rewritten)
            }
        }
    }

    /// Returns true if `INSERT ... RETURNING id` is available.
    #[must_use]
    pub const fn supports_returning(self) -> bool {
        !matches!(self, Self::MySql)
    }

    /// Builds an insert statement that yields the new row's identifier.
    fn insert_statement(self, query: &str) -> String {
        let query = self.bind_markers(query);
        if self.supports_returning() {
            format!("{query} RETURNING id")
        } else {
            query.into_owned()
        }
    }
}

const fn table_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Author => "author",
        RecordKind::Book => "book",
        RecordKind::Comment => "comment",
    }
}

/// Extended SQLite code for a violated `ON DELETE RESTRICT` action.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Maps sqlx errors, separating foreign-key violations from other failures.
fn map_database_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(database_error)
            if database_error.is_foreign_key_violation()
                || database_error.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER) =>
        {
            RepositoryError::IntegrityViolation(database_error.message().to_string())
        }
        _ => RepositoryError::DatabaseError(error.to_string()),
    }
}

/// Returns true if the URL names a private in-memory SQLite database.
fn is_in_memory_sqlite(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

// =============================================================================
// SQL Store
// =============================================================================

/// `LibraryStore` backed by a relational database.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: AnyPool,
    dialect: Dialect,
}

impl SqlStore {
    /// Connects a pool to the database at `url`.
    ///
    /// An in-memory SQLite database exists per connection, so such URLs get a
    /// single connection that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns the sqlx error if the database cannot be reached.
    pub async fn connect(
        url: &str,
        dialect: Dialect,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        sqlx::any::install_default_drivers();

        let options = if dialect == Dialect::Sqlite && is_in_memory_sqlite(url) {
            AnyPoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(max_connections)
        };

        let pool = options.acquire_timeout(acquire_timeout).connect(url).await?;
        Ok(Self { pool, dialect })
    }

    /// Returns the dialect of the connected database.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Creates the tables that do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DatabaseError` if a statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        for statement in self.dialect.schema() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_database_error)?;
        }
        tracing::debug!(dialect = ?self.dialect, "Schema ensured");
        Ok(())
    }

    /// Executes an insert and returns the identifier of the new row.
    async fn execute_insert<'q>(
        dialect: Dialect,
        query: Query<'q, Any, AnyArguments<'q>>,
        connection: &mut AnyConnection,
    ) -> Result<i64, RepositoryError> {
        if dialect.supports_returning() {
            let row = query
                .fetch_one(&mut *connection)
                .await
                .map_err(map_database_error)?;
            row.try_get::<i64, _>(0).map_err(map_database_error)
        } else {
            let result = query
                .execute(&mut *connection)
                .await
                .map_err(map_database_error)?;
            result.last_insert_id().ok_or_else(|| {
                RepositoryError::DatabaseError("driver did not report the inserted id".to_string())
            })
        }
    }

    /// Runs an `UPDATE` of one row inside a transaction.
    ///
    /// `MySQL` reports zero affected rows when nothing changed, so a zero count
    /// is confirmed against the table before it becomes `NotFound`.
    async fn execute_update<'q>(
        &self,
        kind: RecordKind,
        id: i64,
        query: Query<'q, Any, AnyArguments<'q>>,
    ) -> Result<(), RepositoryError> {
        let mut transaction = self.pool.begin().await.map_err(map_database_error)?;
        let result = query
            .execute(&mut *transaction)
            .await
            .map_err(map_database_error)?;

        if result.rows_affected() == 0 {
            let sql = format!("SELECT id FROM {} WHERE id = ?", table_name(kind));
            let existing: Option<(i64,)> = sqlx::query_as(&self.dialect.bind_markers(&sql))
                .bind(id)
                .fetch_optional(&mut *transaction)
                .await
                .map_err(map_database_error)?;
            if existing.is_none() {
                return Err(RepositoryError::NotFound { kind, id });
            }
        }

        transaction.commit().await.map_err(map_database_error)
    }

    /// Deletes one row inside a transaction.
    async fn execute_delete(&self, kind: RecordKind, id: i64) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", table_name(kind));
        let sql = self.dialect.bind_markers(&sql);

        let mut transaction = self.pool.begin().await.map_err(map_database_error)?;
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *transaction)
            .await
            .map_err(map_database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { kind, id });
        }

        transaction.commit().await.map_err(map_database_error)
    }
}

impl LibraryStore for SqlStore {
    fn list_authors(&self) -> StoreFuture<'_, Vec<Author>> {
        Box::pin(async move {
            let rows: Vec<(i64, String)> =
                sqlx::query_as("SELECT id, name FROM author ORDER BY id")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_database_error)?;

            Ok(rows
                .into_iter()
                .map(|(id, name)| Author::new(AuthorId::new(id), name))
                .collect())
        })
    }

    fn find_author(&self, id: AuthorId) -> StoreFuture<'_, Option<Author>> {
        Box::pin(async move {
            let sql = self.dialect.bind_markers("SELECT id, name FROM author WHERE id = ?");
            let row: Option<(i64, String)> = sqlx::query_as(&sql)
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_database_error)?;

            Ok(row.map(|(id, name)| Author::new(AuthorId::new(id), name)))
        })
    }

    fn insert_author(&self, author: NewAuthor) -> StoreFuture<'_, Author> {
        Box::pin(async move {
            let sql = self
                .dialect
                .insert_statement("INSERT INTO author (name) VALUES (?)");

            let mut transaction = self.pool.begin().await.map_err(map_database_error)?;
            let id = Self::execute_insert(
                self.dialect,
                sqlx::query(&sql).bind(author.name.clone()),
                &mut transaction,
            )
            .await?;
            transaction.commit().await.map_err(map_database_error)?;

            Ok(Author::new(AuthorId::new(id), author.name))
        })
    }

    fn insert_authors(&self, authors: Vec<NewAuthor>) -> StoreFuture<'_, Vec<Author>> {
        Box::pin(async move {
            let sql = self
                .dialect
                .insert_statement("INSERT INTO author (name) VALUES (?)");

            let mut transaction = self.pool.begin().await.map_err(map_database_error)?;
            let mut inserted = Vec::with_capacity(authors.len());
            for author in authors {
                let id = Self::execute_insert(
                    self.dialect,
                    sqlx::query(&sql).bind(author.name.clone()),
                    &mut transaction,
                )
                .await?;
                inserted.push(Author::new(AuthorId::new(id), author.name));
            }
            transaction.commit().await.map_err(map_database_error)?;

            Ok(inserted)
        })
    }

    fn update_author(&self, author: Author) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let sql = self
                .dialect
                .bind_markers("UPDATE author SET name = ? WHERE id = ?");
            let query = sqlx::query(&sql)
                .bind(author.name)
                .bind(author.author_id.get());

            self.execute_update(RecordKind::Author, author.author_id.get(), query)
                .await
        })
    }

    fn delete_author(&self, id: AuthorId) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.execute_delete(RecordKind::Author, id.get()).await })
    }

    fn books_by_author(&self, id: AuthorId) -> StoreFuture<'_, Vec<Book>> {
        Box::pin(async move {
            let sql = self.dialect.bind_markers(
                "SELECT id, title, author_id FROM book WHERE author_id = ? ORDER BY id",
            );
            let rows: Vec<(i64, String, i64)> = sqlx::query_as(&sql)
                .bind(id.get())
                .fetch_all(&self.pool)
                .await
                .map_err(map_database_error)?;

            Ok(rows
                .into_iter()
                .map(|(id, title, author_id)| {
                    Book::new(BookId::new(id), title, AuthorId::new(author_id))
                })
                .collect())
        })
    }

    fn find_book(&self, id: BookId) -> StoreFuture<'_, Option<Book>> {
        Box::pin(async move {
            let sql = self
                .dialect
                .bind_markers("SELECT id, title, author_id FROM book WHERE id = ?");
            let row: Option<(i64, String, i64)> = sqlx::query_as(&sql)
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_database_error)?;

            Ok(row.map(|(id, title, author_id)| {
                Book::new(BookId::new(id), title, AuthorId::new(author_id))
            }))
        })
    }

    fn insert_book(&self, book: NewBook) -> StoreFuture<'_, Book> {
        Box::pin(async move {
            let sql = self
                .dialect
                .insert_statement("INSERT INTO book (title, author_id) VALUES (?, ?)");

            let mut transaction = self.pool.begin().await.map_err(map_database_error)?;
            let id = Self::execute_insert(
                self.dialect,
                sqlx::query(&sql)
                    .bind(book.title.clone())
                    .bind(book.author_id.get()),
                &mut transaction,
            )
            .await?;
            transaction.commit().await.map_err(map_database_error)?;

            Ok(Book::new(BookId::new(id), book.title, book.author_id))
        })
    }

    fn update_book(&self, book: Book) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let sql = self
                .dialect
                .bind_markers("UPDATE book SET title = ?, author_id = ? WHERE id = ?");
            let query = sqlx::query(&sql)
                .bind(book.title)
                .bind(book.author_id.get())
                .bind(book.book_id.get());

            self.execute_update(RecordKind::Book, book.book_id.get(), query)
                .await
        })
    }

    fn delete_book(&self, id: BookId) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.execute_delete(RecordKind::Book, id.get()).await })
    }

    fn comments_by_author(&self, id: AuthorId) -> StoreFuture<'_, Vec<Comment>> {
        Box::pin(async move {
            let sql = self.dialect.bind_markers(
                "SELECT id, text, author_id FROM comment WHERE author_id = ? ORDER BY id",
            );
            let rows: Vec<(i64, String, i64)> = sqlx::query_as(&sql)
                .bind(id.get())
                .fetch_all(&self.pool)
                .await
                .map_err(map_database_error)?;

            Ok(rows
                .into_iter()
                .map(|(id, text, author_id)| {
                    Comment::new(CommentId::new(id), text, AuthorId::new(author_id))
                })
                .collect())
        })
    }

    fn find_comment(&self, id: CommentId) -> StoreFuture<'_, Option<Comment>> {
        Box::pin(async move {
            let sql = self
                .dialect
                .bind_markers("SELECT id, text, author_id FROM comment WHERE id = ?");
            let row: Option<(i64, String, i64)> = sqlx::query_as(&sql)
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_database_error)?;

            Ok(row.map(|(id, text, author_id)| {
                Comment::new(CommentId::new(id), text, AuthorId::new(author_id))
            }))
        })
    }

    fn insert_comment(&self, comment: NewComment) -> StoreFuture<'_, Comment> {
        Box::pin(async move {
            let sql = self
                .dialect
                .insert_statement("INSERT INTO comment (text, author_id) VALUES (?, ?)");

            let mut transaction = self.pool.begin().await.map_err(map_database_error)?;
            let id = Self::execute_insert(
                self.dialect,
                sqlx::query(&sql)
                    .bind(comment.text.clone())
                    .bind(comment.author_id.get()),
                &mut transaction,
            )
            .await?;
            transaction.commit().await.map_err(map_database_error)?;

            Ok(Comment::new(
                CommentId::new(id),
                comment.text,
                comment.author_id,
            ))
        })
    }

    fn delete_comment(&self, id: CommentId) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.execute_delete(RecordKind::Comment, id.get()).await })
    }
}

// =============================================================================
// Tests
// =============================================================================
