//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Jira server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::sync::RwLock;

use crate::{ActivityItem, Comment, Issue, IssueFields, IssueRef, User, Version};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Issues indexed by key (e.g. "CRASH-1"); ordered for stable search results.
    pub issues: BTreeMap<String, Issue>,

    /// Every version of every project, in creation order.
    pub versions: Vec<Version>,

    /// Comments indexed by issue key.
    pub comments: HashMap<String, Vec<Comment>>,

    /// Activity entries indexed by user login.
    pub activity: HashMap<String, Vec<ActivityItem>>,

    /// Optional Basic credentials. If set, requests must present them.
    pub required_credentials: Option<(String, String)>,

    /// Counter for server-assigned ids.
    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            next_id: 10000,
            ..Default::default()
        }
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an issue to the state. The issue must carry a key.
    pub fn with_issue(mut self, issue: Issue) -> Self {
        if let Some(key) = issue.key.clone() {
            self.issues.insert(key, issue);
        }
        self
    }

    /// Add a version to the state.
    pub fn with_version(mut self, version: Version) -> Self {
        self.versions.push(version);
        self
    }

    /// Add an activity entry for a user.
    pub fn with_activity(mut self, user: &str, item: ActivityItem) -> Self {
        self.activity.entry(user.to_string()).or_default().push(item);
        self
    }

    /// Require Basic authentication with the given credentials.
    pub fn with_required_credentials(mut self, login: &str, password: &str) -> Self {
        self.required_credentials = Some((login.to_string(), password.to_string()));
        self
    }

    /// Whether an `Authorization` header value satisfies the required credentials.
    pub fn is_authorized(&self, header: Option<&str>) -> bool {
        let Some((login, password)) = &self.required_credentials else {
            return true;
        };
        let expected = format!("Basic {}", BASE64.encode(format!("{login}:{password}")));
        header == Some(expected.as_str())
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Get an issue by key or numeric id.
    pub fn get_issue(&self, key_or_id: &str) -> Option<&Issue> {
        self.issues.get(key_or_id).or_else(|| {
            self.issues
                .values()
                .find(|i| i.id.as_deref() == Some(key_or_id))
        })
    }

    fn get_issue_mut(&mut self, key_or_id: &str) -> Option<&mut Issue> {
        let key = self.get_issue(key_or_id)?.key.clone()?;
        self.issues.get_mut(&key)
    }

    /// Issues matching a filter, in key order.
    pub fn find_issues(&self, filter: &IssueFilter) -> Vec<&Issue> {
        self.issues.values().filter(|i| filter.matches(i)).collect()
    }

    /// Store a new issue, assigning it an id and a key in its project.
    pub fn create_issue(&mut self, mut issue: Issue, base_url: &str) -> Option<IssueRef> {
        let project_key = issue
            .fields
            .as_ref()?
            .project
            .as_ref()?
            .key
            .clone()?;

        let id = self.allocate_id();
        let number = self
            .issues
            .keys()
            .filter(|k| k.starts_with(&format!("{project_key}-")))
            .count()
            + 1;
        let key = format!("{project_key}-{number}");
        let self_link = format!("{base_url}/rest/api/2/issue/{id}");

        issue.id = Some(id.to_string());
        issue.key = Some(key.clone());
        issue.self_link = Some(self_link.clone());
        self.issues.insert(key.clone(), issue);

        Some(IssueRef {
            id: id.to_string(),
            key,
            self_link,
        })
    }

    /// Merge edited fields into an issue.
    pub fn update_issue_fields(&mut self, key_or_id: &str, edit: IssueFields) -> bool {
        let Some(issue) = self.get_issue_mut(key_or_id) else {
            return false;
        };
        let fields = issue.fields_mut();

        if edit.summary.is_some() {
            fields.summary = edit.summary;
        }
        if edit.description.is_some() {
            fields.description = edit.description;
        }
        if edit.versions.is_some() {
            fields.versions = edit.versions;
        }
        fields.extra.extend(edit.extra);
        true
    }

    /// Attach a stored version to an issue by version id.
    pub fn add_version_to_issue(&mut self, key_or_id: &str, version_id: &str) -> Result<(), String> {
        let version = self
            .versions
            .iter()
            .find(|v| v.id.as_deref() == Some(version_id))
            .cloned()
            .ok_or_else(|| format!("Version with id '{version_id}' does not exist."))?;

        let issue = self
            .get_issue_mut(key_or_id)
            .ok_or_else(|| "Issue does not exist".to_string())?;
        issue.fields_mut().add_version(version);
        Ok(())
    }

    /// Versions belonging to a project.
    pub fn project_versions(&self, project_key: &str) -> Vec<&Version> {
        self.versions
            .iter()
            .filter(|v| v.project.as_deref() == Some(project_key))
            .collect()
    }

    /// Store a new version, assigning it an id.
    pub fn create_version(&mut self, mut version: Version, base_url: &str) -> Version {
        let id = self.allocate_id();
        version.id = Some(id.to_string());
        version.self_link = Some(format!("{base_url}/rest/api/2/version/{id}"));
        version.released.get_or_insert(false);
        version.archived.get_or_insert(false);
        self.versions.push(version.clone());
        version
    }

    /// Store a comment, filling in what the server owns.
    pub fn add_comment(&mut self, key_or_id: &str, body: String, author: &str) -> Option<Comment> {
        let key = self.get_issue(key_or_id)?.key.clone()?;
        let id = self.allocate_id();
        let comment = Comment {
            id: Some(id.to_string()),
            body,
            author: Some(User {
                name: Some(author.to_string()),
                ..Default::default()
            }),
            created: Some("2024-03-01T10:15:30.000+0000".to_string()),
            ..Default::default()
        };
        self.comments.entry(key).or_default().push(comment.clone());
        Some(comment)
    }

    /// Comments stored for an issue.
    pub fn comments_for(&self, key: &str) -> &[Comment] {
        self.comments.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Activity entries for a user.
    pub fn activity_for(&self, user: &str) -> &[ActivityItem] {
        self.activity.get(user).map(Vec::as_slice).unwrap_or_default()
    }
}

/// The small subset of JQL the mock understands.
///
/// `assignee = "name"` and `project = KEY` clauses joined by `AND`; anything
/// else matches every issue.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IssueFilter {
    pub assignee: Option<String>,
    pub project: Option<String>,
}

impl IssueFilter {
    pub fn parse(jql: &str) -> Self {
        let mut filter = Self::default();
        for clause in jql.split(" AND ") {
            let Some((field, value)) = clause.split_once('=') else {
                continue;
            };
            let value = value
                .trim()
                .trim_matches('"')
                .replace("\\\"", "\"")
                .replace("\\\\", "\\");
            match field.trim().to_ascii_lowercase().as_str() {
                "assignee" => filter.assignee = Some(value),
                "project" => filter.project = Some(value),
                _ => {}
            }
        }
        filter
    }

    fn matches(&self, issue: &Issue) -> bool {
        let fields = issue.fields.as_ref();
        let assignee_ok = self.assignee.as_deref().map_or(true, |wanted| {
            fields
                .and_then(|f| f.assignee.as_ref())
                .and_then(|u| u.name.as_deref())
                == Some(wanted)
        });
        let project_ok = self.project.as_deref().map_or(true, |wanted| {
            fields
                .and_then(|f| f.project.as_ref())
                .and_then(|p| p.key.as_deref())
                == Some(wanted)
        });
        assignee_ok && project_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_add_and_get_issue() {
        let state = MockState::new().with_issue(Fixtures::issue("CRASH-1", "10001", "Boom"));

        assert_eq!(state.get_issue("CRASH-1").unwrap().summary(), Some("Boom"));
        assert_eq!(state.get_issue("10001").unwrap().key.as_deref(), Some("CRASH-1"));
        assert!(state.get_issue("CRASH-2").is_none());
    }

    #[test]
    fn test_create_issue_assigns_key_in_project() {
        let mut state = MockState::new().with_issue(Fixtures::issue("CRASH-1", "10001", "Boom"));

        let created = state
            .create_issue(Issue::new("CRASH", "Bug"), "http://mock")
            .unwrap();

        assert_eq!(created.key, "CRASH-2");
        assert!(created.self_link.starts_with("http://mock/rest/api/2/issue/"));
        assert!(state.get_issue("CRASH-2").is_some());
    }

    #[test]
    fn test_create_issue_without_project_fails() {
        let mut state = MockState::new();
        assert!(state.create_issue(Issue::default(), "http://mock").is_none());
    }

    #[test]
    fn test_filter_parse() {
        let filter = IssueFilter::parse(r#"project = CRASH AND assignee = "bob""#);
        assert_eq!(filter.project.as_deref(), Some("CRASH"));
        assert_eq!(filter.assignee.as_deref(), Some("bob"));

        assert_eq!(IssueFilter::parse("ORDER BY created"), IssueFilter::default());
    }

    #[test]
    fn test_add_version_to_issue() {
        let mut state = MockState::new().with_issue(Fixtures::issue("CRASH-1", "10001", "Boom"));
        let version = state.create_version(Version::new("CRASH", "1.0"), "http://mock");
        let id = version.id.unwrap();

        state.add_version_to_issue("CRASH-1", &id).unwrap();
        state.add_version_to_issue("CRASH-1", &id).unwrap();

        let versions = state.get_issue("CRASH-1").unwrap().fields.as_ref().unwrap().versions.clone();
        assert_eq!(versions.unwrap().len(), 1);
        assert!(state.add_version_to_issue("CRASH-1", "nope").is_err());
    }

    #[test]
    fn test_authorization() {
        let open = MockState::new();
        assert!(open.is_authorized(None));

        let locked = MockState::new().with_required_credentials("bot", "secret");
        assert!(!locked.is_authorized(None));
        assert!(locked.is_authorized(Some("Basic Ym90OnNlY3JldA==")));
    }
}
