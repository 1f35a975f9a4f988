//! Error types for Jira API operations.

use thiserror::Error;

/// Errors that can occur during Jira API operations.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Configuration is missing or incomplete.
    #[error("Jira configuration required: {0}")]
    ConfigMissing(String),

    /// A request could not be built from the given input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Page size of zero; page arithmetic is undefined.
    #[error("Invalid pagination: maxResults must be greater than zero (got {max_results})")]
    InvalidPagination { max_results: u32 },

    /// The server reported more pages than the client will enumerate.
    #[error("Result spans {page_count} pages, more than the limit of {limit}")]
    PageLimitExceeded { page_count: u32, limit: u32 },

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Credentials were refused.
    #[error("Authentication failed: check login and password")]
    Unauthorized,

    /// API request failed.
    #[error("Jira API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// The server answered a write that should produce no body with a payload.
    #[error("Jira rejected the request: {0}")]
    Rejected(String),

    /// HTTP transport error, including undecodable compressed bodies.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Atom feed parsing error.
    #[error("Failed to parse activity feed: {0}")]
    FeedError(#[from] quick_xml::DeError),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Result type alias for Jira operations.
pub type Result<T> = core::result::Result<T, JiraError>;
