//! Execution tests for issue and comment operations.
//!
//! Uses wiremock to mock the Jira API and test actual execution flow.

use jirapi::{
    add_comment, get_issue, Comment, Create, Get, Issue, JiraClient, JiraError, User,
};
use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> JiraClient {
    JiraClient::with_credentials(&server.uri(), "bot", "secret").unwrap()
}

fn issue_json() -> Value {
    json!({
        "expand": "renderedFields,names",
        "id": "10042",
        "self": "https://jira.example.com/rest/api/2/issue/10042",
        "key": "CRASH-7",
        "fields": {
            "issuetype": {"name": "Bug", "subtask": false},
            "summary": "Segfault in renderer",
            "reporter": {"name": "alice", "displayName": "Alice"},
            "assignee": {"name": "bob", "displayName": "Bob"},
            "project": {"key": "CRASH", "name": "Crash Reports"},
            "created": "2024-03-01T10:15:30.000+0100",
            "versions": [{"id": "20001", "name": "1.0"}],
            "customfield_10021": "linux-x86_64",
            "customfield_10022": null,
            "comment": {"comments": [], "total": 0}
        }
    })
}

#[tokio::test]
async fn test_get_issue_sends_basic_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/CRASH-7"))
        .and(basic_auth("bot", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let issue = Issue::get(&client(&mock_server), "CRASH-7".to_string())
        .await
        .unwrap();

    assert_eq!(issue.key.as_deref(), Some("CRASH-7"));
    assert_eq!(issue.summary(), Some("Segfault in renderer"));

    let fields = issue.fields.as_ref().unwrap();
    assert_eq!(fields.custom_field("customfield_10021"), Some(&json!("linux-x86_64")));
    assert_eq!(fields.versions.as_ref().unwrap()[0].name, "1.0");
    assert!(issue.created_at().is_some());
}

#[tokio::test]
async fn test_get_missing_issue_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/CRASH-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorMessages": ["Issue Does Not Exist"],
            "errors": {}
        })))
        .mount(&mock_server)
        .await;

    let result = get_issue(&client(&mock_server), "CRASH-404").await;

    match result {
        Err(JiraError::NotFound { entity_type, id }) => {
            assert_eq!(entity_type, "Issue");
            assert_eq!(id, "CRASH-404");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_credentials_are_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/CRASH-7"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let result = get_issue(&client(&mock_server), "CRASH-7").await;
    assert!(matches!(result, Err(JiraError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error_carries_jira_messages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/CRASH-7"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errorMessages": ["Internal server error"],
            "errors": {}
        })))
        .mount(&mock_server)
        .await;

    match get_issue(&client(&mock_server), "CRASH-7").await {
        Err(JiraError::ApiError {
            message,
            status_code,
        }) => {
            assert_eq!(status_code, Some(500));
            assert_eq!(message, "Internal server error");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_save_omits_server_owned_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/rest/api/2/issue/CRASH-7"))
        .and(header("content-type", "application/json;charset=UTF-8"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut issue: Issue = serde_json::from_value(issue_json()).unwrap();
    issue.fields_mut().summary = Some("Segfault in renderer on resize".to_string());

    issue.save(&client(&mock_server)).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Value = requests[0].body_json().unwrap();
    let fields = sent["fields"].as_object().unwrap();

    assert!(!fields.contains_key("reporter"));
    assert!(!fields.contains_key("assignee"));
    assert!(!fields.contains_key("created"));
    assert!(!fields.contains_key("comment"));
    assert!(!fields.contains_key("customfield_10022"));
    assert_eq!(fields["customfield_10021"], "linux-x86_64");
    assert_eq!(fields["summary"], "Segfault in renderer on resize");

    // The local copy is stripped too
    assert!(issue.fields.as_ref().unwrap().reporter.is_none());
}

#[tokio::test]
async fn test_save_with_response_body_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/rest/api/2/issue/CRASH-7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"warning\":\"ignored\"}"))
        .mount(&mock_server)
        .await;

    let mut issue: Issue = serde_json::from_value(issue_json()).unwrap();
    let result = issue.save(&client(&mock_server)).await;

    match result {
        Err(JiraError::Rejected(body)) => assert!(body.contains("ignored")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_save_without_identity_fails_before_request() {
    let mock_server = MockServer::start().await;

    let mut issue = Issue::new("CRASH", "Bug");
    let result = issue.save(&client(&mock_server)).await;

    assert!(matches!(result, Err(JiraError::InvalidInput(_))));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_issue_returns_reference() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/"))
        .and(body_json(json!({
            "fields": {
                "issuetype": {"name": "Bug"},
                "summary": "Crash on startup",
                "project": {"key": "CRASH"},
                "versions": []
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "10050",
            "key": "CRASH-8",
            "self": "https://jira.example.com/rest/api/2/issue/10050"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut issue = Issue::new("CRASH", "Bug");
    issue.fields_mut().summary = Some("Crash on startup".to_string());

    let created = issue.create(&client(&mock_server)).await.unwrap();

    assert_eq!(created.key, "CRASH-8");
    assert_eq!(created.id, "10050");
    assert!(created.self_link.ends_with("/issue/10050"));
}

#[tokio::test]
async fn test_add_comment_returns_stored_comment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/CRASH-7/comment"))
        .and(body_json(json!({"body": "Seen again on 1.2.1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "30001",
            "self": "https://jira.example.com/rest/api/2/issue/10042/comment/30001",
            "body": "Seen again on 1.2.1",
            "author": {"name": "bot", "displayName": "Build Bot"},
            "created": "2024-03-02T08:00:00.000+0000"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stored = add_comment(
        &client(&mock_server),
        "CRASH-7",
        &Comment::new("Seen again on 1.2.1"),
    )
    .await
    .unwrap();

    assert_eq!(stored.id.as_deref(), Some("30001"));
    assert_eq!(
        stored.author,
        Some(User {
            name: Some("bot".to_string()),
            display_name: Some("Build Bot".to_string()),
            ..Default::default()
        })
    );
}

#[tokio::test]
async fn test_find_missing_issue_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/issue/CRASH-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let found = Issue::find(&client(&mock_server), "CRASH-404".to_string())
        .await
        .unwrap();
    assert!(found.is_none());
}
