//! Issue comments.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::issue::User;

/// A comment on an issue.
///
/// Only `body` is sent when creating; the server echoes the stored comment
/// with its id, author and timestamps filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,

    #[serde(default)]
    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl Comment {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }
}

/// Add a comment to an issue and return the server's copy.
///
/// # Example
///
/// ```ignore
/// use jirapi::{add_comment, Comment, JiraClient};
///
/// let client = JiraClient::from_env()?;
/// let stored = add_comment(&client, "CRASH-7", &Comment::new("Seen again on 1.2.1")).await?;
/// println!("comment id {:?}", stored.id);
/// ```
#[tracing::instrument(skip(client, comment))]
pub async fn add_comment(client: &JiraClient, issue_key: &str, comment: &Comment) -> Result<Comment> {
    let url = client.api_url(&format!(
        "/issue/{}/comment",
        urlencoding::encode(issue_key)
    ))?;
    client.send_json(Method::POST, url, comment).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_comment_sends_only_body() {
        let json = serde_json::to_value(Comment::new("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"body": "hello"}));
    }

    #[test]
    fn test_comment_deserialize_echo() {
        let json = r#"{
            "self": "https://jira.example.com/rest/api/2/issue/10042/comment/10500",
            "id": "10500",
            "author": {"name": "bot", "displayName": "Crash Bot"},
            "body": "hello",
            "created": "2024-03-01T10:15:30.000+0000",
            "updated": "2024-03-01T10:15:30.000+0000"
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id.as_deref(), Some("10500"));
        assert_eq!(comment.body, "hello");
        assert_eq!(comment.author.unwrap().label(), Some("Crash Bot"));
    }
}
