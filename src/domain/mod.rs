//! Domain module for the bookshelf.
//!
//! This module contains the three record kinds (authors, books and comments),
//! their identifier newtypes and the payloads used to insert new records.

use serde::{Deserialize, Serialize};

pub use author::{Author, AuthorDetail, AuthorId, NewAuthor};
pub use book::{Book, BookId, NewBook};
pub use comment::{Comment, CommentId, NewComment};

// =============================================================================
// Record Kind
// =============================================================================

/// The kind of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Author,
    Book,
    Comment,
}

impl RecordKind {
    /// Returns the human-readable name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Book => "Book",
            Self::Comment => "Comment",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

// =============================================================================
// Identifier Newtypes
// =============================================================================

/// Declares a store-assigned integer identifier newtype.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw identifier assigned by the store.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<$name> for i64 {
            fn from(identifier: $name) -> Self {
                identifier.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

pub mod author;
pub mod book;
pub mod comment;
