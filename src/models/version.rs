//! Project versions and their attachment to issues.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::issue::IssueRef;
use crate::traits::Create;

/// A project version (release).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Server-assigned id; absent until the version is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    /// Version name; unique within a project.
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning project key (used when creating).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

impl Version {
    /// A version with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A version definition ready to be created in `project_key`.
    pub fn new(project_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: Some(project_key.into()),
            ..Self::named(name)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_released(&self) -> bool {
        self.released.unwrap_or(false)
    }
}

/// Edit instruction adding a version to an issue's version list.
#[derive(Debug, Serialize)]
struct AddVersionUpdate<'a> {
    update: VersionsUpdate<'a>,
}

#[derive(Debug, Serialize)]
struct VersionsUpdate<'a> {
    versions: [VersionOp<'a>; 1],
}

#[derive(Debug, Serialize)]
struct VersionOp<'a> {
    add: VersionId<'a>,
}

#[derive(Debug, Serialize)]
struct VersionId<'a> {
    id: &'a str,
}

impl<'a> AddVersionUpdate<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            update: VersionsUpdate {
                versions: [VersionOp {
                    add: VersionId { id },
                }],
            },
        }
    }
}

#[async_trait]
impl Create for Version {
    type Output = Version;

    #[tracing::instrument(skip(self, client), fields(name = %self.name))]
    async fn create(&self, client: &JiraClient) -> Result<Version> {
        let url = client.api_url("/version/")?;
        client.send_json(Method::POST, url, self).await
    }
}

// Convenience functions for working with versions

/// Fetch every version of a project, in server order.
///
/// # Example
///
/// ```ignore
/// use jirapi::{get_versions, JiraClient};
///
/// let client = JiraClient::from_env()?;
/// for version in get_versions(&client, "CRASH").await? {
///     println!("{} released={}", version.name, version.is_released());
/// }
/// ```
#[tracing::instrument(skip(client))]
pub async fn get_versions(client: &JiraClient, project_key: &str) -> Result<Vec<Version>> {
    let url = client.api_url(&format!(
        "/project/{}/versions",
        urlencoding::encode(project_key)
    ))?;
    client.get_json(url).await
}

/// Create a version and return it with its server-assigned id.
pub async fn create_version(client: &JiraClient, version: &Version) -> Result<Version> {
    version.create(client).await
}

/// Add an existing version to an issue's affected versions.
///
/// # Errors
///
/// Returns [`JiraError::InvalidInput`] if the issue has no key or the
/// version has no id, and [`JiraError::Rejected`] with the response text if
/// the server answers with a body.
#[tracing::instrument(skip(client, issue, version), fields(issue = %issue.key, version = %version.name))]
pub async fn add_version_to_issue(
    client: &JiraClient,
    issue: &IssueRef,
    version: &Version,
) -> Result<()> {
    if issue.key.is_empty() {
        return Err(JiraError::InvalidInput(
            "issue reference has no key".to_string(),
        ));
    }
    let version_id = version.id.as_deref().ok_or_else(|| {
        JiraError::InvalidInput(format!("version '{}' has no id", version.name))
    })?;

    let url = client.api_url(&format!("/issue/{}", urlencoding::encode(&issue.key)))?;
    client
        .send_expecting_empty(Method::PUT, url, &AddVersionUpdate::new(version_id))
        .await
}
