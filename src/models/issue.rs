//! Issue model and trait implementations.
//!
//! An issue carries its identity (`id`, `key`, `self`) and a [`IssueFields`]
//! block. Fields without a typed counterpart, custom fields in particular,
//! are kept in an open map keyed by field id.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::version::Version;
use crate::traits::{Create, Get};

/// Timestamp layout used by Jira for `created`, `updated` and friends.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Prefix shared by all custom field ids.
pub const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// A Jira issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Numeric issue id, as a string (e.g. "10042").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Issue key (e.g. "PROJ-7").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// REST link to this issue.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<IssueFields>,
}

/// The fields block of an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(rename = "issuetype", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<IssueType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Server-managed; cleared before a save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<User>,

    /// Server-managed; cleared before a save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,

    /// Creation time in [`DATE_FORMAT`]. Server-managed; cleared before a save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Affected versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<Version>>,

    /// Every other field, keyed by field id (e.g. `customfield_10021`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Reference returned when an issue is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_link: String,
}

/// Issue type (Bug, Task, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "subTask", default, skip_serializing_if = "Option::is_none")]
    pub subtask: Option<bool>,
}

/// The project an issue belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URLs keyed by size (e.g. "48x48").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_urls: Option<BTreeMap<String, String>>,
}

/// A Jira user as embedded in issues and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl User {
    /// Display name, falling back to the login name.
    pub fn label(&self) -> Option<&str> {
        self.display_name.as_deref().or(self.name.as_deref())
    }
}

impl Issue {
    /// Start a new issue for `project_key` with the given type name.
    ///
    /// The version list starts out empty so [`IssueFields::add_version`] can
    /// be used straight away.
    pub fn new(project_key: &str, issue_type: &str) -> Self {
        Self {
            fields: Some(IssueFields {
                issue_type: Some(IssueType {
                    name: Some(issue_type.to_string()),
                    ..Default::default()
                }),
                project: Some(Project {
                    key: Some(project_key.to_string()),
                    ..Default::default()
                }),
                versions: Some(Vec::new()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Mutable access to the fields block, creating it if absent.
    pub fn fields_mut(&mut self) -> &mut IssueFields {
        self.fields.get_or_insert_with(IssueFields::default)
    }

    /// The key if known, otherwise the id.
    pub fn key_or_id(&self) -> Option<&str> {
        self.key.as_deref().or(self.id.as_deref())
    }

    pub fn summary(&self) -> Option<&str> {
        self.fields.as_ref().and_then(|f| f.summary.as_deref())
    }

    /// Parsed creation time.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.fields.as_ref().and_then(IssueFields::created_at)
    }

    /// Reference to this issue, if it carries an identity.
    pub fn to_ref(&self) -> Option<IssueRef> {
        self.key_or_id()?;
        Some(IssueRef {
            id: self.id.clone().unwrap_or_default(),
            key: self.key.clone().unwrap_or_default(),
            self_link: self.self_link.clone().unwrap_or_default(),
        })
    }

    /// Push this issue's fields back to the server.
    ///
    /// Reporter, assignee and creation time are cleared first; they are
    /// owned by the server and rejected on write.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::InvalidInput`] if the issue has no key or id, and
    /// [`JiraError::Rejected`] if the server answers with a body.
    #[tracing::instrument(skip(self, client), fields(issue = ?self.key_or_id()))]
    pub async fn save(&mut self, client: &JiraClient) -> Result<()> {
        if let Some(fields) = self.fields.as_mut() {
            fields.strip_server_fields();
        }

        let key = self
            .key_or_id()
            .ok_or_else(|| JiraError::InvalidInput("issue has no key or id to save".to_string()))?;
        let url = client.api_url(&format!("/issue/{}", urlencoding::encode(key)))?;

        client.send_expecting_empty(Method::PUT, url, &*self).await
    }
}

impl IssueFields {
    /// Clear fields the server owns and drop everything it refuses on write.
    ///
    /// Of the untyped fields only non-null custom fields are kept.
    pub fn strip_server_fields(&mut self) {
        self.reporter = None;
        self.assignee = None;
        self.created = None;
        self.extra
            .retain(|id, value| id.starts_with(CUSTOM_FIELD_PREFIX) && !value.is_null());
    }

    /// Attach a version unless one with the same name is already present.
    ///
    /// Returns `true` if the version was appended.
    pub fn add_version(&mut self, version: Version) -> bool {
        let versions = self.versions.get_or_insert_with(Vec::new);
        if versions.iter().any(|v| v.name == version.name) {
            return false;
        }
        versions.push(version);
        true
    }

    /// Look up an untyped field by id.
    pub fn custom_field(&self, id: &str) -> Option<&Value> {
        self.extra.get(id)
    }

    /// Set an untyped field, returning the previous value.
    pub fn set_custom_field(&mut self, id: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.extra.insert(id.into(), value.into())
    }

    /// Parsed creation time.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a Jira timestamp such as `2024-03-01T10:15:30.000+0100`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

#[async_trait]
impl Get for Issue {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &JiraClient, id: Self::Id) -> Result<Self> {
        let url = client.api_url(&format!("/issue/{}", urlencoding::encode(&id)))?;

        client.get_json(url).await.map_err(|e| match e {
            JiraError::ApiError {
                status_code: Some(404),
                ..
            } => JiraError::NotFound {
                entity_type: "Issue",
                id,
            },
            other => other,
        })
    }
}

#[async_trait]
impl Create for Issue {
    type Output = IssueRef;

    #[tracing::instrument(skip(self, client))]
    async fn create(&self, client: &JiraClient) -> Result<IssueRef> {
        let url = client.api_url("/issue/")?;
        let created: IssueRef = client.send_json(Method::POST, url, self).await?;
        tracing::debug!(key = %created.key, "created issue");
        Ok(created)
    }
}

// Convenience functions for working with issues

/// Get a single issue by id or key.
///
/// # Example
///
/// ```ignore
/// use jirapi::{get_issue, JiraClient};
///
/// let client = JiraClient::from_env()?;
/// let issue = get_issue(&client, "PROJ-7").await?;
/// println!("{:?}", issue.summary());
/// ```
pub async fn get_issue(client: &JiraClient, id: &str) -> Result<Issue> {
    Issue::get(client, id.to_string()).await
}

/// Save an issue; see [`Issue::save`].
pub async fn save_issue(client: &JiraClient, issue: &mut Issue) -> Result<()> {
    issue.save(client).await
}

/// Create an issue and return the server's reference to it.
pub async fn create_issue(client: &JiraClient, issue: &Issue) -> Result<IssueRef> {
    issue.create(client).await
}
