//! Version endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{authorize, base_url, error_messages, field_error, SharedState};
use crate::Version;

/// GET /rest/api/2/project/{key}/versions
pub async fn list_versions(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(project): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let known_project = state.issues.keys().any(|k| k.starts_with(&format!("{project}-")))
        || state.versions.iter().any(|v| v.project.as_deref() == Some(project.as_str()));
    if !known_project {
        return error_messages(
            StatusCode::NOT_FOUND,
            format!("No project could be found with key '{project}'."),
        );
    }

    let versions: Vec<Version> = state.project_versions(&project).into_iter().cloned().collect();
    (StatusCode::OK, Json(versions)).into_response()
}

/// POST /rest/api/2/version
pub async fn create_version(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(version): Json<Version>,
) -> Response {
    let mut state = state.write().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let Some(project) = version.project.clone() else {
        return field_error("project", "Project must be specified to create a version.");
    };
    if version.name.trim().is_empty() {
        return field_error("name", "You must specify a valid version name");
    }
    let duplicate = state
        .project_versions(&project)
        .iter()
        .any(|v| v.name == version.name);
    if duplicate {
        return field_error("name", "A version with this name already exists in this project.");
    }

    let created = state.create_version(version, &base_url(&headers));
    (StatusCode::CREATED, Json(created)).into_response()
}
