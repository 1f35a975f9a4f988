//! Issue and comment endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::{authorize, base_url, current_user, error_messages, field_error, SharedState};
use crate::{Comment, Issue, IssueFields};

/// Fields the server owns; writing them is refused.
const READ_ONLY_FIELDS: [&str; 3] = ["reporter", "assignee", "created"];

/// GET /rest/api/2/issue/{key}
pub async fn get_issue(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    match state.get_issue(&key) {
        Some(issue) => (StatusCode::OK, Json(issue.clone())).into_response(),
        None => error_messages(StatusCode::NOT_FOUND, "Issue Does Not Exist"),
    }
}

/// PUT /rest/api/2/issue/{key}
///
/// Accepts either a `fields` edit or an `update.versions` list of `add`
/// operations. Answers 204 with no body on success.
pub async fn update_issue(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    if state.get_issue(&key).is_none() {
        return error_messages(StatusCode::NOT_FOUND, "Issue Does Not Exist");
    }

    if let Some(ops) = body.pointer("/update/versions").and_then(Value::as_array) {
        for op in ops {
            let Some(version_id) = op.pointer("/add/id").and_then(Value::as_str) else {
                return field_error("versions", "Only 'add' operations with an id are supported");
            };
            if let Err(message) = state.add_version_to_issue(&key, version_id) {
                return field_error("versions", message);
            }
        }
    }

    if let Some(fields) = body.get("fields") {
        if let Some(field) = READ_ONLY_FIELDS
            .iter()
            .find(|f| fields.get(**f).is_some_and(|v| !v.is_null()))
        {
            return field_error(
                field,
                format!("Field '{field}' cannot be set. It is not on the appropriate screen, or unknown."),
            );
        }

        let edit: IssueFields = match serde_json::from_value(fields.clone()) {
            Ok(edit) => edit,
            Err(e) => return error_messages(StatusCode::BAD_REQUEST, e.to_string()),
        };
        state.update_issue_fields(&key, edit);
    }

    StatusCode::NO_CONTENT.into_response()
}

/// POST /rest/api/2/issue
pub async fn create_issue(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(issue): Json<Issue>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let has_summary = issue.summary().is_some_and(|s| !s.trim().is_empty());
    if !has_summary {
        return field_error("summary", "You must specify a summary of the issue.");
    }

    match state.create_issue(issue, &base_url(&headers)) {
        Some(created) => (StatusCode::CREATED, Json(created)).into_response(),
        None => field_error("project", "project is required"),
    }
}

/// POST /rest/api/2/issue/{key}/comment
pub async fn add_comment(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(comment): Json<Comment>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    if comment.body.trim().is_empty() {
        return field_error("comment", "Comment body can not be empty!");
    }

    let author = current_user(&state);
    match state.add_comment(&key, comment.body, &author) {
        Some(mut stored) => {
            stored.self_link = stored
                .id
                .as_ref()
                .map(|id| format!("{}/rest/api/2/issue/{key}/comment/{id}", base_url(&headers)));
            (StatusCode::CREATED, Json(stored)).into_response()
        }
        None => error_messages(StatusCode::NOT_FOUND, "Issue Does Not Exist"),
    }
}
