//! Mock Jira server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Jira REST
//! API and activity stream for integration and end-to-end testing. Unlike
//! wiremock which mocks at the HTTP level per-test, this server maintains
//! state across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use jirapi::mock_server::MockServer;
//! use jirapi::{Get, Issue, JiraClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = JiraClient::with_credentials(server.url(), "bot", "secret").unwrap();
//!
//!     // Server comes with default fixtures
//!     let issue = Issue::get(&client, "CRASH-1".to_string()).await.unwrap();
//!     assert_eq!(issue.summary(), Some("Segfault in renderer"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use handlers::render_feed;
pub use server::MockServer;
pub use state::{IssueFilter, MockState};
