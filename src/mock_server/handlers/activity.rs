//! Activity-stream endpoint handler.

use std::fmt::Write;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use quick_xml::escape::escape;
use serde::Deserialize;

use super::{authorize, base_url, SharedState};
use crate::ActivityItem;

/// Query parameters of the activity endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    pub streams: Option<String>,
}

impl ActivityParams {
    /// The user named by a `user IS <name>` stream filter.
    fn user(&self) -> Option<&str> {
        self.streams
            .as_deref()?
            .strip_prefix("user IS ")
            .map(str::trim)
    }
}

/// GET /activity
pub async fn user_activity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<ActivityParams>,
) -> Response {
    let state = state.read().await;
    if let Err(rejection) = authorize(&state, &headers) {
        return rejection;
    }

    let entries = params
        .user()
        .map(|user| state.activity_for(user))
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/atom+xml;charset=UTF-8")],
        render_feed(&base_url(&headers), entries),
    )
        .into_response()
}

/// Render entries as an Atom document.
pub fn render_feed(base_url: &str, entries: &[ActivityItem]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    let _ = write!(
        xml,
        r#"<id>{base}/activity</id><link href="{base}/activity" rel="self"/><title type="text">Activity Stream</title>"#,
        base = escape(base_url)
    );
    if let Some(updated) = entries.iter().filter_map(|e| e.updated).max() {
        let _ = write!(xml, "<updated>{}</updated>", updated.to_rfc3339());
    }

    for entry in entries {
        xml.push_str("<entry>");
        let _ = write!(xml, "<id>{}</id>", escape(entry.id.as_str()));
        let _ = write!(xml, r#"<title type="text">{}</title>"#, escape(entry.title.as_str()));
        if let Some(ref author) = entry.author {
            xml.push_str("<author>");
            if let Some(ref name) = author.name {
                let _ = write!(xml, "<name>{}</name>", escape(name.as_str()));
            }
            xml.push_str("</author>");
        }
        if let Some(published) = entry.published {
            let _ = write!(xml, "<published>{}</published>", published.to_rfc3339());
        }
        if let Some(updated) = entry.updated {
            let _ = write!(xml, "<updated>{}</updated>", updated.to_rfc3339());
        }
        for category in &entry.categories {
            let _ = write!(xml, r#"<category term="{}"/>"#, escape(category.term.as_str()));
        }
        for link in &entry.links {
            let _ = write!(xml, r#"<link href="{}""#, escape(link.href.as_str()));
            if let Some(ref rel) = link.rel {
                let _ = write!(xml, r#" rel="{}""#, escape(rel.as_str()));
            }
            xml.push_str("/>");
        }
        if let Some(ref summary) = entry.summary {
            let _ = write!(
                xml,
                r#"<summary type="{}">{}</summary>"#,
                escape(summary.kind.as_deref().unwrap_or("text")),
                escape(summary.body.as_str())
            );
        }
        xml.push_str("</entry>");
    }

    xml.push_str("</feed>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;
    use crate::parse_feed;

    #[test]
    fn test_streams_user() {
        let params = ActivityParams {
            streams: Some("user IS alice".to_string()),
        };
        assert_eq!(params.user(), Some("alice"));
        assert_eq!(ActivityParams::default().user(), None);
    }

    #[test]
    fn test_rendered_feed_parses_back() {
        let mut item = Fixtures::activity_item("alice", "created", "CRASH-1");
        item.title = "alice <created> CRASH-1 & more".to_string();

        let xml = render_feed("http://mock", &[item.clone()]);
        let feed = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(feed.title, "Activity Stream");
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].title, item.title);
        assert_eq!(feed.entries[0].category(), Some("created"));
        assert_eq!(feed.entries[0].link(), Some("http://mock/browse/CRASH-1"));
    }
}
