use std::fmt;

use thiserror::Error;

/// What a failed lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Widget,
    Button,
}

impl LookupKind {
    const fn scope_noun(self) -> &'static str {
        match self {
            Self::Widget => "subreddit",
            Self::Button => "button widget",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Widget => write!(f, "Button widget"),
            Self::Button => write!(f, "Button"),
        }
    }
}

/// A widget or button lookup ran out of candidates.
///
/// `scope` is the subreddit for widget lookups and the widget's short name
/// for button lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} named {searched_name} not found in {} {scope}", .kind.scope_noun())]
pub struct NotFoundError {
    pub kind: LookupKind,
    pub searched_name: String,
    pub scope: String,
}

impl NotFoundError {
    pub fn widget(searched_name: &str, subreddit: &str) -> Self {
        Self {
            kind: LookupKind::Widget,
            searched_name: searched_name.to_string(),
            scope: subreddit.to_string(),
        }
    }

    pub fn button(searched_name: &str, widget_name: &str) -> Self {
        Self {
            kind: LookupKind::Button,
            searched_name: searched_name.to_string(),
            scope: widget_name.to_string(),
        }
    }
}

/// Failures reported by the remote widget service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP 403: the account is not a moderator of the subreddit, or the
    /// subreddit is private.
    #[error("forbidden: {url}")]
    Forbidden { url: String },
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid widget json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The serialized button list has no record for the button that was
    /// found, so there is nothing safe to submit.
    #[error(
        "serialized buttons of widget {widget} have no record with text {text:?}"
    )]
    MissingRecord { widget: String, text: String },
    /// The widget to update lists a button that is not a text or image
    /// button with a `text` and a `url`.
    #[error("buttons of widget {widget} could not be read: {source}")]
    InvalidButtons {
        widget: String,
        source: serde_json::Error,
    },
}

impl UpdateError {
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Self::Service(ServiceError::Forbidden { .. }))
    }
}
