//! HTTP layer: handlers, forms, notices, presentation and routing.

pub mod authors;
pub mod books;
pub mod comments;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod notice;
pub mod routes;
pub mod view;

pub use dto::{
    AuthorDetailContext, AuthorForm, BookForm, CommentForm, CreateContext, ListingContext,
    UpdateContext,
};
pub use error::ApiErrorResponse;
pub use handlers::{AppState, HealthResponse, health_check, render_page};
pub use notice::{Notice, NoticeCategory, Page, PendingNotices, RedirectWithNotices};
pub use routes::create_router;
pub use view::{HtmlPresenter, PresentationError, Presenter, Template};
