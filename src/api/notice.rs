//! One-shot notices shown on the page rendered after a redirect.
//!
//! A mutation answers with [`RedirectWithNotices`], which stores its notices
//! in the `notices` cookie. The next rendered page reads them through the
//! [`PendingNotices`] extractor and clears the cookie via [`Page::consuming`],
//! so every notice is displayed exactly once.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderValue, header, request::Parts};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

/// Name of the cookie carrying pending notices.
pub const NOTICE_COOKIE: &str = "notices";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

// =============================================================================
// Notice
// =============================================================================

/// Presentation category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    Success,
}

impl NoticeCategory {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice-success",
        }
    }
}

/// A message for the user, displayed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub category: NoticeCategory,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: NoticeCategory::Success,
            message: message.into(),
        }
    }
}

fn encode_notices(notices: &[Notice]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(notices)?;
    Ok(urlencoding::encode(&json).into_owned())
}

fn decode_notices(value: &str) -> Option<Vec<Notice>> {
    let json = urlencoding::decode(value).ok()?;
    serde_json::from_str(&json).ok()
}

// =============================================================================
// Pending Notices Extractor
// =============================================================================

/// Notices left for this request by the previous response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingNotices {
    notices: Vec<Notice>,
    cookie_present: bool,
}

impl PendingNotices {
    /// Reads the notice cookie from request headers.
    ///
    /// A malformed cookie yields no notices but still counts as present, so the
    /// rendered page clears it.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookie = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == NOTICE_COOKIE)
            .map(|(_, value)| value);

        let Some(value) = cookie else {
            return Self::default();
        };

        let notices = decode_notices(value).unwrap_or_else(|| {
            tracing::warn!(cookie = value, "Ignoring malformed notice cookie");
            Vec::new()
        });

        Self {
            notices,
            cookie_present: true,
        }
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Returns true if the request carried the notice cookie.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.cookie_present
    }
}

impl<S> FromRequestParts<S> for PendingNotices
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

// =============================================================================
// Responses
// =============================================================================

/// `303 See Other` redirect that hands notices to the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectWithNotices {
    location: String,
    notices: Vec<Notice>,
}

impl RedirectWithNotices {
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl IntoResponse for RedirectWithNotices {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(&self.location).into_response();
        if self.notices.is_empty() {
            return response;
        }

        let cookie = encode_notices(&self.notices)
            .map(|value| format!("{NOTICE_COOKIE}={value}; {COOKIE_ATTRIBUTES}"));
        match cookie.as_deref().map(HeaderValue::from_str) {
            Ok(Ok(value)) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Ok(Err(error)) => tracing::warn!(%error, "Dropping notices: invalid cookie value"),
            Err(error) => tracing::warn!(%error, "Dropping notices: serialization failed"),
        }
        response
    }
}

/// A rendered HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    html: String,
    clear_notices: bool,
}

impl Page {
    #[must_use]
    pub const fn new(html: String) -> Self {
        Self {
            html,
            clear_notices: false,
        }
    }

    /// Marks the pending notices as displayed, clearing their cookie.
    #[must_use]
    pub fn consuming(mut self, pending: &PendingNotices) -> Self {
        self.clear_notices = pending.is_present();
        self
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut response = Html(self.html).into_response();
        if self.clear_notices {
            let expired = format!("{NOTICE_COOKIE}=; Max-Age=0; {COOKIE_ATTRIBUTES}");
            if let Ok(value) = HeaderValue::from_str(&expired) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

// =============================================================================
// Tests
// =============================================================================
