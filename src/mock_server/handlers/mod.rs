//! HTTP request handlers for the mock server.

pub mod activity;
pub mod issues;
pub mod search;
pub mod versions;

pub use activity::*;
pub use issues::*;
pub use search::*;
pub use versions::*;

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// State handle shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Reject the request unless it carries the required Basic credentials.
pub(crate) fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if state.is_authorized(header) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"mock\"")],
            "Unauthorized",
        )
            .into_response())
    }
}

/// Jira-shaped error body with top-level messages.
pub(crate) fn error_messages(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (
        status,
        Json(serde_json::json!({
            "errorMessages": [message],
            "errors": {}
        })),
    )
        .into_response()
}

/// Jira-shaped error body with one field error.
pub(crate) fn field_error(field: &str, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "errorMessages": [],
            "errors": { field: message }
        })),
    )
        .into_response()
}

/// Base URL as seen by the caller, for building `self` links.
pub(crate) fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

/// Login of the configured account, used as comment author.
pub(crate) fn current_user(state: &MockState) -> String {
    state
        .required_credentials
        .as_ref()
        .map(|(login, _)| login.clone())
        .unwrap_or_else(|| "anonymous".to_string())
}
