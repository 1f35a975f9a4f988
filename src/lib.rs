//! Jira API client library.
//!
//! A Rust library for the Jira REST API (issues, search, comments,
//! versions) and the activity-stream Atom feed. Operations that map onto a
//! single entity are traits ([`Get`], [`Create`]) implemented by the entity
//! types; the rest are plain async functions.
//!
//! # Quick Start
//!
//! ```no_run
//! use jirapi::{Comment, Get, Issue, JiraClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> jirapi::Result<()> {
//!     // Create client from environment variables
//!     let client = JiraClient::from_env()?;
//!
//!     // Search with JQL; pagination is computed for you
//!     let result = jirapi::search(&client, "project = CRASH", &SearchQuery::default()).await?;
//!     println!("{} issues over {} pages", result.total, result.pagination.page_count);
//!
//!     // Fetch a single issue and comment on it
//!     let issue = Issue::get(&client, "CRASH-7".to_string()).await?;
//!     println!("{:?}", issue.summary());
//!     jirapi::add_comment(&client, "CRASH-7", &Comment::new("Seen again")).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`JiraConfig::from_env`] reads:
//!
//! - `JIRA_URL`, `JIRA_LOGIN`, `JIRA_PASSWORD` (required)
//! - `JIRA_API_PATH` (defaults to `/rest/api/2`)
//! - `JIRA_ACTIVITY_PATH` (defaults to `/activity`)
//! - `JIRA_ACCEPT_INVALID_CERTS` (opt-in, for self-signed instances)
//! - `JIRA_DUMP_DIR` (write the last request/response bodies there)

pub mod cli;
mod client;
mod config;
pub mod diagnostics;
mod error;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
pub mod output;
mod pagination;
mod traits;

// Re-export core types
pub use client::JiraClient;
pub use config::{Credentials, JiraConfig};
pub use diagnostics::{ExchangeObserver, FileDumpObserver, TracingObserver};
pub use error::{JiraError, Result};
pub use pagination::{Pagination, SearchQuery, DEFAULT_MAX_RESULTS, MAX_PAGE_COUNT};

// Re-export traits
pub use traits::{Create, Get};

// Re-export models
pub use models::{
    // Issue types
    Issue,
    IssueFields,
    IssueRef,
    IssueType,
    Project,
    User,
    // Version types
    Version,
    // Comment types
    Comment,
    // Search types
    SearchResult,
    // Activity types
    ActivityFeed,
    ActivityItem,
    Category,
    Link,
    Person,
    Text,
};

// Re-export convenience functions
pub use models::{create_issue, get_issue, save_issue};
pub use models::{add_version_to_issue, create_version, get_versions};
pub use models::{issues_assigned_to, quote_jql, search, search_all};
pub use models::{activity, parse_feed, user_activity};
pub use models::{add_comment, parse_timestamp, DATE_FORMAT};
