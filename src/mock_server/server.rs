//! Mock Jira server.
//!
//! Provides an axum-based HTTP server that simulates the Jira REST API and
//! its activity stream.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Jira server for testing.
///
/// The server runs in the background and can be used to test the Jira client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `JiraClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for issue in scenario.issues {
            state = state.with_issue(issue);
        }

        for version in scenario.versions {
            state = state.with_version(version);
        }

        for (user, item) in scenario.activity {
            state = state.with_activity(&user, item);
        }

        state
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Search
            .route("/rest/api/2/search", get(handlers::search_issues))
            // Issue routes
            .route("/rest/api/2/issue", post(handlers::create_issue))
            .route("/rest/api/2/issue/", post(handlers::create_issue))
            .route(
                "/rest/api/2/issue/:key",
                get(handlers::get_issue).put(handlers::update_issue),
            )
            .route("/rest/api/2/issue/:key/comment", post(handlers::add_comment))
            // Version routes
            .route(
                "/rest/api/2/project/:key/versions",
                get(handlers::list_versions),
            )
            .route("/rest/api/2/version", post(handlers::create_version))
            .route("/rest/api/2/version/", post(handlers::create_version))
            // Activity stream
            .route("/activity", get(handlers::user_activity))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::{Comment, Get, Issue, JiraClient};

    fn client_for(server: &MockServer) -> JiraClient {
        JiraClient::with_credentials(server.url(), "bot", "secret").unwrap()
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_issue_with_jira_client() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let issue = Issue::get(&client, "CRASH-1".to_string())
            .await
            .expect("Failed to get issue");

        assert_eq!(issue.summary(), Some("Segfault in renderer"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = client_for(&server);

        let result = Issue::get(&client, "CRASH-1".to_string()).await;
        assert!(matches!(result, Err(crate::JiraError::NotFound { .. })));

        let found = Issue::find(&client, "CRASH-1".to_string()).await.unwrap();
        assert!(found.is_none());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state = MockState::new().with_issue(Fixtures::issue("OPS-4", "4", "Disk full"));

        let server = MockServer::with_state(state).await;
        let client = client_for(&server);

        let stored = crate::add_comment(&client, "OPS-4", &Comment::new("Cleaned /tmp"))
            .await
            .expect("Failed to add comment");
        assert_eq!(stored.body, "Cleaned /tmp");

        let state = server.state();
        assert_eq!(state.read().await.comments_for("OPS-4").len(), 1);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_requires_credentials() {
        let state = MockState::new()
            .with_required_credentials("bot", "secret")
            .shared();
        let app = MockServer::create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rest/api/2/search?jql=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_router_rejects_server_owned_fields() {
        let state = MockState::new()
            .with_issue(Fixtures::assigned_issue("CRASH-1", "1", "Boom", "alice"))
            .shared();
        let app = MockServer::create_router(state);

        let body = serde_json::json!({"fields": {"reporter": {"name": "mallory"}}});
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/rest/api/2/issue/CRASH-1")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
