//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::DateTime;

use crate::{
    ActivityItem, Category, Issue, IssueFields, IssueType, Link, Person, Project, Text, User,
    Version,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Issue Fixtures
    // =========================================================================

    /// Create a minimal issue with a key, id and summary.
    pub fn issue(key: &str, id: &str, summary: &str) -> Issue {
        let project_key = key.split('-').next().unwrap_or(key);
        Issue {
            id: Some(id.to_string()),
            key: Some(key.to_string()),
            self_link: Some(format!("http://mock/rest/api/2/issue/{id}")),
            expand: None,
            fields: Some(IssueFields {
                issue_type: Some(IssueType {
                    name: Some("Bug".to_string()),
                    ..Default::default()
                }),
                summary: Some(summary.to_string()),
                project: Some(Project {
                    key: Some(project_key.to_string()),
                    ..Default::default()
                }),
                created: Some("2024-03-01T10:15:30.000+0000".to_string()),
                versions: Some(vec![]),
                ..Default::default()
            }),
        }
    }

    /// Create an issue with a reporter and an assignee.
    pub fn assigned_issue(key: &str, id: &str, summary: &str, assignee: &str) -> Issue {
        let mut issue = Self::issue(key, id, summary);
        let fields = issue.fields_mut();
        fields.reporter = Some(Self::user("reporter"));
        fields.assignee = Some(Self::user(assignee));
        issue
    }

    /// Create a user with a login and a display name derived from it.
    pub fn user(name: &str) -> User {
        User {
            name: Some(name.to_string()),
            key: Some(name.to_string()),
            display_name: Some(format!("{} (mock)", name)),
            active: Some(true),
            ..Default::default()
        }
    }

    // =========================================================================
    // Version Fixtures
    // =========================================================================

    /// Create a stored version of a project.
    pub fn version(project: &str, id: &str, name: &str, released: bool) -> Version {
        Version {
            id: Some(id.to_string()),
            self_link: Some(format!("http://mock/rest/api/2/version/{id}")),
            name: name.to_string(),
            project: Some(project.to_string()),
            released: Some(released),
            archived: Some(false),
            ..Default::default()
        }
    }

    // =========================================================================
    // Activity Fixtures
    // =========================================================================

    /// Create an activity entry about an issue.
    pub fn activity_item(user: &str, verb: &str, issue_key: &str) -> ActivityItem {
        let when = DateTime::parse_from_rfc3339("2024-03-01T09:59:00.000Z").ok();
        ActivityItem {
            title: format!("{user} {verb} {issue_key}"),
            id: format!("urn:mock:{user}:{verb}:{issue_key}"),
            links: vec![Link {
                rel: Some("alternate".to_string()),
                href: format!("http://mock/browse/{issue_key}"),
            }],
            published: when,
            updated: when,
            author: Some(Person {
                name: Some(user.to_string()),
                ..Default::default()
            }),
            categories: vec![Category {
                term: verb.to_string(),
            }],
            summary: Some(Text {
                kind: Some("text".to_string()),
                body: format!("{verb} {issue_key}"),
            }),
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Create a complete default scenario with related data.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            issues: vec![
                Self::assigned_issue("CRASH-1", "10001", "Segfault in renderer", "alice"),
                Self::assigned_issue("CRASH-2", "10002", "Crash on startup", "bob"),
                Self::assigned_issue("CRASH-3", "10003", "Out of memory on import", "alice"),
                Self::issue("DOCS-1", "10004", "Document the importer"),
            ],
            versions: vec![
                Self::version("CRASH", "20001", "1.0", true),
                Self::version("CRASH", "20002", "1.1", false),
            ],
            activity: vec![
                ("alice".to_string(), Self::activity_item("alice", "created", "CRASH-1")),
                ("alice".to_string(), Self::activity_item("alice", "commented", "CRASH-3")),
            ],
        }
    }
}

/// A default test scenario with related data.
pub struct DefaultScenario {
    pub issues: Vec<Issue>,
    pub versions: Vec<Version>,
    /// Activity entries paired with the user they belong to.
    pub activity: Vec<(String, ActivityItem)>,
}
