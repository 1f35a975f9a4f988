//! Activity streams (Atom feeds).
//!
//! The activity endpoint answers with an Atom document rather than JSON.
//! Only the parts of the feed worth reading are modelled; vendor extension
//! elements are skipped.

use chrono::{DateTime, FixedOffset};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::JiraClient;
use crate::error::Result;

/// An Atom feed of user activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFeed {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub id: String,

    #[serde(rename(deserialize = "link"), default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub updated: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub author: Option<Person>,

    #[serde(rename(deserialize = "entry"), default)]
    pub entries: Vec<ActivityItem>,
}

/// One entry of an activity feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub id: String,

    #[serde(rename(deserialize = "link"), default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub published: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub updated: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub author: Option<Person>,

    #[serde(rename(deserialize = "category"), default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub summary: Option<Text>,
}

impl ActivityItem {
    /// The first category term, which names the kind of activity.
    pub fn category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.term.as_str())
    }

    /// The `alternate` link, or the first link if none is marked.
    pub fn link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref() == Some("alternate"))
            .or_else(|| self.links.first())
            .map(|l| l.href.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename(deserialize = "@rel"), default)]
    pub rel: Option<String>,
    #[serde(rename(deserialize = "@href"), default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Text construct with its declared type (`text`, `html`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    #[serde(rename(deserialize = "@type"), default)]
    pub kind: Option<String>,
    #[serde(rename(deserialize = "$text"), default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename(deserialize = "@term"), default)]
    pub term: String,
}

/// Decode an Atom document.
pub fn parse_feed(xml: &[u8]) -> Result<ActivityFeed> {
    Ok(quick_xml::de::from_reader(xml)?)
}

/// Fetch the activity stream of `user`.
///
/// # Example
///
/// ```ignore
/// use jirapi::{user_activity, JiraClient};
///
/// let client = JiraClient::from_env()?;
/// let feed = user_activity(&client, "alice").await?;
/// for entry in &feed.entries {
///     println!("{} {}", entry.category().unwrap_or("-"), entry.title);
/// }
/// ```
#[tracing::instrument(skip(client))]
pub async fn user_activity(client: &JiraClient, user: &str) -> Result<ActivityFeed> {
    let mut url = client.activity_url()?;
    url.query_pairs_mut()
        .append_pair("streams", &format!("user IS {user}"));
    fetch_feed(client, url).await
}

/// Fetch and decode an activity feed from an arbitrary URL.
///
/// Useful for following `next` links found in a previous feed.
#[tracing::instrument(skip(client))]
pub async fn activity(client: &JiraClient, url: &str) -> Result<ActivityFeed> {
    fetch_feed(client, Url::parse(url)?).await
}

async fn fetch_feed(client: &JiraClient, url: Url) -> Result<ActivityFeed> {
    let contents = client.execute(Method::GET, url, None).await?;
    let feed = parse_feed(&contents)?;
    tracing::debug!(entries = feed.entries.len(), "decoded activity feed");
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:activity="http://activitystrea.ms/spec/1.0/">
  <id>https://jira.example.com/activity</id>
  <link href="https://jira.example.com/activity?streams=user+IS+alice" rel="self"/>
  <title type="text">Activity Stream</title>
  <author><name>Jira</name></author>
  <updated>2024-03-01T10:00:00.000Z</updated>
  <entry>
    <id>urn:uuid:1b6f0c3e-6c2a-4a3b-9d8e-0f0d0c0b0a09</id>
    <title type="html">Alice created CRASH-7</title>
    <author>
      <name>Alice</name>
      <email>alice@example.com</email>
      <uri>https://jira.example.com/secure/ViewProfile.jspa?name=alice</uri>
    </author>
    <published>2024-03-01T09:59:00.000Z</published>
    <updated>2024-03-01T09:59:00.000Z</updated>
    <category term="created"/>
    <link href="https://jira.example.com/browse/CRASH-7" rel="alternate"/>
    <link href="https://jira.example.com/images/bug.png" rel="http://streams.atlassian.com/syndication/icon"/>
    <summary type="html">Segfault in renderer</summary>
    <activity:verb>http://activitystrea.ms/schema/1.0/post</activity:verb>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_with_one_entry() {
        let feed = parse_feed(FEED.as_bytes()).expect("Failed to parse feed");

        assert_eq!(feed.title, "Activity Stream");
        assert_eq!(feed.id, "https://jira.example.com/activity");
        assert_eq!(feed.links.len(), 1);
        assert_eq!(feed.links[0].rel.as_deref(), Some("self"));
        assert_eq!(feed.entries.len(), 1);

        let entry = &feed.entries[0];
        assert_eq!(entry.title, "Alice created CRASH-7");
        assert_eq!(entry.id, "urn:uuid:1b6f0c3e-6c2a-4a3b-9d8e-0f0d0c0b0a09");
        assert_eq!(entry.category(), Some("created"));
        assert_eq!(entry.link(), Some("https://jira.example.com/browse/CRASH-7"));
        assert_eq!(entry.author.as_ref().unwrap().name.as_deref(), Some("Alice"));

        let summary = entry.summary.as_ref().unwrap();
        assert_eq!(summary.kind.as_deref(), Some("html"));
        assert_eq!(summary.body, "Segfault in renderer");
        assert!(entry.updated.is_some());
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><id>urn:x</id><title>Empty</title></feed>"#;
        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(feed.title, "Empty");
        assert!(feed.entries.is_empty());
        assert!(feed.updated.is_none());
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(parse_feed(b"{\"not\": \"xml\"}").is_err());
    }
}
