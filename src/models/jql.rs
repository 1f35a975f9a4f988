//! JQL search.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::issue::Issue;
use crate::pagination::{Pagination, SearchQuery, DEFAULT_MAX_RESULTS};

/// Maximum pages to fetch in [`search_all`] (safety limit).
const MAX_PAGES: u32 = 1000;

/// One window of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,

    #[serde(default)]
    pub start_at: u32,

    #[serde(default)]
    pub max_results: u32,

    #[serde(default)]
    pub total: u32,

    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Computed on the client after decoding.
    #[serde(default, skip_deserializing)]
    pub pagination: Pagination,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }
}

impl IntoIterator for SearchResult {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResult {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

/// Run a JQL search for one window of results.
///
/// The returned result carries a [`Pagination`] computed from the window the
/// server actually used.
///
/// # Errors
///
/// Returns [`JiraError::InvalidPagination`] if `query.max_results` is zero.
/// Returns [`JiraError::PageLimitExceeded`] if the reported total spans more
/// than [`crate::MAX_PAGE_COUNT`] pages.
///
/// # Example
///
/// ```ignore
/// use jirapi::{search, JiraClient, SearchQuery};
///
/// let client = JiraClient::from_env()?;
/// let result = search(&client, "project = CRASH ORDER BY created DESC", &SearchQuery::default()).await?;
/// println!("page {} of {}", result.pagination.page + 1, result.pagination.page_count);
/// ```
#[tracing::instrument(skip(client))]
pub async fn search(client: &JiraClient, jql: &str, query: &SearchQuery) -> Result<SearchResult> {
    if query.max_results == 0 {
        return Err(JiraError::InvalidPagination { max_results: 0 });
    }

    let url = search_url(client, jql, query)?;
    let mut result: SearchResult = client.get_json(url).await?;

    // Some servers omit maxResults on empty results; fall back to what was asked.
    let window = if result.max_results == 0 {
        query.max_results
    } else {
        result.max_results
    };
    result.pagination = Pagination::compute(result.total, result.start_at, window)?;

    tracing::debug!(
        total = result.total,
        returned = result.issues.len(),
        "search complete"
    );
    Ok(result)
}

/// Run a JQL search and collect every page.
///
/// # Errors
///
/// Returns an error if any page request fails.
#[tracing::instrument(skip(client))]
pub async fn search_all(client: &JiraClient, jql: &str) -> Result<Vec<Issue>> {
    let mut all_issues = Vec::new();
    let mut query = SearchQuery::window(0, DEFAULT_MAX_RESULTS);
    let mut pages = 0;

    loop {
        let result = search(client, jql, &query).await?;
        let returned = result.issues.len();
        let next = result.pagination.next_start_at();
        all_issues.extend(result.issues);

        pages += 1;
        match next {
            Some(start_at) if returned > 0 => query.start_at = start_at,
            _ => break,
        }

        // Safety limit to prevent infinite loops
        if pages >= MAX_PAGES {
            tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
            break;
        }
    }

    Ok(all_issues)
}

/// Search issues assigned to `user`.
pub async fn issues_assigned_to(
    client: &JiraClient,
    user: &str,
    query: &SearchQuery,
) -> Result<SearchResult> {
    search(client, &format!("assignee = {}", quote_jql(user)), query).await
}

fn search_url(client: &JiraClient, jql: &str, query: &SearchQuery) -> Result<Url> {
    let mut url = client.api_url("/search")?;
    url.query_pairs_mut()
        .append_pair("jql", jql)
        .append_pair("startAt", &query.start_at.to_string())
        .append_pair("maxResults", &query.max_results.to_string());
    Ok(url)
}

/// Quote a value as a JQL string literal.
pub fn quote_jql(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
