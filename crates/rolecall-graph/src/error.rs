//! Error types for Graph resolution.

use thiserror::Error;

/// Result type alias using [`GraphError`].
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while resolving app-role assignments.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Input validation failed before any network access.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The application or its assignments could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// OAuth2 token acquisition failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Structured error returned by Microsoft Graph.
    #[error("Graph API error: {code} - {message}")]
    GraphApi {
        code: String,
        message: String,
        inner_error: Option<String>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL construction error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Retry budget exhausted while the service kept throttling.
    #[error("Maximum retries ({attempts}) exceeded")]
    MaxRetriesExceeded { attempts: u32 },
}

impl GraphError {
    /// True for the two terminal lookup failures of the resolution core.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
