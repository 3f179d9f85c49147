//! Form payloads and template contexts.
//!
//! Forms are decoded by axum's `Form` extractor; a missing or mistyped field is
//! rejected before a handler runs. Contexts are serialized to JSON and handed
//! to the [`Presenter`](super::view::Presenter).

use serde::{Deserialize, Serialize};

use super::notice::Notice;
use crate::domain::{Author, AuthorDetail, AuthorId, Book, RecordKind};

// =============================================================================
// Forms
// =============================================================================

/// Body of the author create and update forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorForm {
    pub name: String,
}

/// Body of the book create and update forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author_id: AuthorId,
}

/// Body of the add-comment form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

// =============================================================================
// Template Contexts
// =============================================================================

/// Context of `Read.html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingContext {
    pub notices: Vec<Notice>,
    pub authors: Vec<Author>,
}

/// Context of `Create.html`.
///
/// `authors` feeds the book form's author selector and is empty for the
/// author form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContext {
    pub notices: Vec<Notice>,
    pub kind: RecordKind,
    pub authors: Vec<Author>,
}

/// Context of `Update.html`, tagged by the kind of record being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateContext {
    Author {
        notices: Vec<Notice>,
        author: Author,
    },
    Book {
        notices: Vec<Notice>,
        book: Book,
        authors: Vec<Author>,
    },
}

/// Context of `author_detail.html`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetailContext {
    pub notices: Vec<Notice>,
    #[serde(flatten)]
    pub detail: AuthorDetail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookId;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_update_context_is_tagged_by_kind() {
        let context = UpdateContext::Book {
            notices: Vec::new(),
            book: Book::new(BookId::new(3), "Dune", AuthorId::new(1)),
            authors: vec![Author::new(AuthorId::new(1), "Frank")],
        };

        let value = serde_json::to_value(&context).unwrap();

        assert_eq!(value["kind"], "book");
        assert_eq!(value["book"]["title"], "Dune");
        assert_eq!(value["authors"][0]["author_id"], 1);
    }

    #[rstest]
    fn test_author_detail_context_flattens_detail() {
        let context = AuthorDetailContext {
            notices: vec![Notice::success("Comment added successfully!")],
            detail: AuthorDetail {
                author: Author::new(AuthorId::new(2), "Ursula"),
                books: Vec::new(),
                comments: Vec::new(),
            },
        };

        let value = serde_json::to_value(&context).unwrap();

        assert_eq!(
            value,
            json!({
                "notices": [{"category": "success", "message": "Comment added successfully!"}],
                "author": {"author_id": 2, "name": "Ursula"},
                "books": [],
                "comments": []
            })
        );
    }
}
