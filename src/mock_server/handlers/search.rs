//! Search endpoint handler.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{authorize, SharedState};
use crate::mock_server::state::IssueFilter;
use crate::{Issue, DEFAULT_MAX_RESULTS};

/// Query parameters for a search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub jql: String,
    pub start_at: Option<u32>,
    pub max_results: Option<u32>,
}

/// GET /rest/api/2/search
pub async fn search_issues(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let start_at = params.start_at.unwrap_or(0);
    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

    let matching = state.find_issues(&IssueFilter::parse(&params.jql));
    let total = matching.len() as u32;

    // Apply pagination
    let issues: Vec<Issue> = matching
        .into_iter()
        .skip(start_at as usize)
        .take(max_results as usize)
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "expand": "names,schema",
            "startAt": start_at,
            "maxResults": max_results,
            "total": total,
            "issues": issues,
        })),
    )
        .into_response()
}
