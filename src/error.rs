use ::scraper::error::SelectorErrorKind;

use crate::model::Platform;

/// All errors that can occur while fetching and normalizing platform data.
#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    /// The user has no handle registered for this platform. No request is made.
    #[error("{platform} username not set")]
    NotConfigured { platform: Platform },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expect.
    #[error("malformed json from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    /// The upstream answered, but its own status flag reports a failure.
    #[error("{platform} reported failure: {message}")]
    UpstreamStatus { platform: Platform, message: String },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// An endpoint URL could not be built.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The caller's deadline expired before the upstream answered.
    #[error("{resource} timed out")]
    Timeout { resource: String },

    /// The profile store has no such user.
    #[error("user {user_id} not found")]
    UserNotFound { user_id: String },

    /// The profile store itself failed.
    #[error("profile store error: {0}")]
    ProfileStore(String),
}

impl<'a> From<SelectorErrorKind<'a>> for StatsError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        StatsError::Selector(err.to_string())
    }
}

/// Coarse classification of a [`StatsError`], as seen by the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum FailureKind {
    /// Handle missing; never attempted against upstream.
    NotConfigured,
    /// Unknown user in the profile store.
    NotFound,
    /// Network, status, body, or extraction failure.
    Upstream,
}

impl StatsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            StatsError::NotConfigured { .. } => FailureKind::NotConfigured,
            StatsError::UserNotFound { .. } => FailureKind::NotFound,
            _ => FailureKind::Upstream,
        }
    }

    /// HTTP-equivalent status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            FailureKind::NotConfigured => 400,
            FailureKind::NotFound => 404,
            FailureKind::Upstream => 500,
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            StatsError::Http { .. } | StatsError::ResponseBody { .. } => true,
            StatsError::UnexpectedStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
