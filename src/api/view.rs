//! Presentation seam: named templates rendered from JSON contexts.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::dto::{AuthorDetailContext, CreateContext, ListingContext, UpdateContext};
use super::notice::Notice;
use crate::domain::{Author, AuthorId, RecordKind};

/// Pages the application renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Read,
    Create,
    Update,
    AuthorDetail,
}

impl Template {
    /// Returns the template file name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "Read.html",
            Self::Create => "Create.html",
            Self::Update => "Update.html",
            Self::AuthorDetail => "author_detail.html",
        }
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Errors raised while rendering a template.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// The context does not have the shape the template expects.
    #[error("Invalid context for template {template}: {source}")]
    InvalidContext {
        template: Template,
        #[source]
        source: serde_json::Error,
    },
}

/// Renders a named template with a context mapping into markup.
pub trait Presenter: Send + Sync {
    /// # Errors
    ///
    /// Returns `PresentationError` if the context cannot fill the template.
    fn render(&self, template: Template, context: &Value) -> Result<String, PresentationError>;
}

// =============================================================================
// HTML Presenter
// =============================================================================

/// Built-in presenter producing self-contained HTML pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn parse_context<T: DeserializeOwned>(
    template: Template,
    context: &Value,
) -> Result<T, PresentationError> {
    T::deserialize(context).map_err(|source| PresentationError::InvalidContext { template, source })
}

impl Presenter for HtmlPresenter {
    fn render(&self, template: Template, context: &Value) -> Result<String, PresentationError> {
        let page = match template {
            Template::Read => render_listing(&parse_context(template, context)?),
            Template::Create => render_create(&parse_context(template, context)?),
            Template::Update => render_update(&parse_context(template, context)?),
            Template::AuthorDetail => render_author_detail(&parse_context(template, context)?),
        };
        Ok(page)
    }
}

/// Escapes text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

fn layout(title: &str, notices: &[Notice], body: &str) -> String {
    let mut notice_list = String::new();
    if !notices.is_empty() {
        notice_list.push_str("<ul class=\"notices\">");
        for notice in notices {
            notice_list.push_str(&format!(
                "<li class=\"notice {}\">{}</li>",
                notice.category.css_class(),
                escape_html(&notice.message)
            ));
        }
        notice_list.push_str("</ul>");
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<nav><a href=\"/\">Authors</a> | <a href=\"/author/create\">Add author</a> | \
         <a href=\"/book/create\">Add book</a></nav>\n{notice_list}\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn delete_button(action: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\" class=\"inline\"><button type=\"submit\">Delete</button></form>"
    )
}

fn author_options(authors: &[Author], selected: Option<AuthorId>) -> String {
    authors
        .iter()
        .map(|author| {
            let marker = if Some(author.author_id) == selected {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{marker}>{}</option>",
                author.author_id,
                escape_html(&author.name)
            )
        })
        .collect()
}

fn render_listing(context: &ListingContext) -> String {
    let body = if context.authors.is_empty() {
        "<h1>Authors</h1>\n<p>No authors yet.</p>".to_string()
    } else {
        let items: String = context
            .authors
            .iter()
            .map(|author| {
                let id = author.author_id;
                format!(
                    "<li><a href=\"/author/{id}\">{name}</a> \
                     <a href=\"/author/update/{id}\">Update</a> {delete}</li>\n",
                    name = escape_html(&author.name),
                    delete = delete_button(&format!("/author/delete/{id}")),
                )
            })
            .collect();
        format!("<h1>Authors</h1>\n<ul class=\"authors\">\n{items}</ul>")
    };
    layout("Authors", &context.notices, &body)
}

fn render_create(context: &CreateContext) -> String {
    let body = match context.kind {
        RecordKind::Book => format!(
            "<h1>Create Book</h1>\n<form method=\"post\" action=\"/book/create\">\n\
             <label>Title <input type=\"text\" name=\"title\" maxlength=\"200\" required></label>\n\
             <label>Author <select name=\"author_id\" required>{options}</select></label>\n\
             <button type=\"submit\">Create</button>\n</form>",
            options = author_options(&context.authors, None),
        ),
        RecordKind::Author | RecordKind::Comment => "<h1>Create Author</h1>\n\
             <form method=\"post\" action=\"/author/create\">\n\
             <label>Name <input type=\"text\" name=\"name\" maxlength=\"100\" required></label>\n\
             <button type=\"submit\">Create</button>\n</form>"
            .to_string(),
    };
    layout(&format!("Create {}", context.kind), &context.notices, &body)
}

fn render_update(context: &UpdateContext) -> String {
    match context {
        UpdateContext::Author { notices, author } => {
            let body = format!(
                "<h1>Update Author</h1>\n<form method=\"post\" action=\"/author/update/{id}\">\n\
                 <label>Name <input type=\"text\" name=\"name\" maxlength=\"100\" value=\"{name}\" required></label>\n\
                 <button type=\"submit\">Update</button>\n</form>",
                id = author.author_id,
                name = escape_html(&author.name),
            );
            layout("Update Author", notices, &body)
        }
        UpdateContext::Book {
            notices,
            book,
            authors,
        } => {
            let body = format!(
                "<h1>Update Book</h1>\n<form method=\"post\" action=\"/book/update/{id}\">\n\
                 <label>Title <input type=\"text\" name=\"title\" maxlength=\"200\" value=\"{title}\" required></label>\n\
                 <label>Author <select name=\"author_id\" required>{options}</select></label>\n\
                 <button type=\"submit\">Update</button>\n</form>\n{delete}",
                id = book.book_id,
                title = escape_html(&book.title),
                options = author_options(authors, Some(book.author_id)),
                delete = delete_button(&format!("/book/delete/{}", book.book_id)),
            );
            layout("Update Book", notices, &body)
        }
    }
}

fn render_author_detail(context: &AuthorDetailContext) -> String {
    let detail = &context.detail;
    let author_id = detail.author.author_id;

    let books = if detail.books.is_empty() {
        "<p>No books yet.</p>".to_string()
    } else {
        let items: String = detail
            .books
            .iter()
            .map(|book| {
                format!(
                    "<li>{title} <a href=\"/book/update/{id}\">Update</a> {delete}</li>\n",
                    title = escape_html(&book.title),
                    id = book.book_id,
                    delete = delete_button(&format!("/book/delete/{}", book.book_id)),
                )
            })
            .collect();
        format!("<ul class=\"books\">\n{items}</ul>")
    };

    let comments = if detail.comments.is_empty() {
        "<p>No comments yet.</p>".to_string()
    } else {
        let items: String = detail
            .comments
            .iter()
            .map(|comment| {
                format!(
                    "<li>{text} {delete}</li>\n",
                    text = escape_html(&comment.text),
                    delete = delete_button(&format!(
                        "/comment/delete/{}/{author_id}",
                        comment.comment_id
                    )),
                )
            })
            .collect();
        format!("<ul class=\"comments\">\n{items}</ul>")
    };

    let body = format!(
        "<h1>{name}</h1>\n<h2>Books</h2>\n{books}\n<h2>Comments</h2>\n{comments}\n\
         <form method=\"post\" action=\"/author/{author_id}/comment\">\n\
         <label>Comment <textarea name=\"comment\" required></textarea></label>\n\
         <button type=\"submit\">Add comment</button>\n</form>",
        name = escape_html(&detail.author.name),
    );
    layout(&detail.author.name, &context.notices, &body)
}

// =============================================================================
// Tests
// =============================================================================
