//! Jira API CLI binary.
//!
//! A command-line interface for interacting with the Jira API.

use std::process::ExitCode;

use clap::Parser;
use jirapi::cli::{Cli, Command};
use jirapi::output::PrettyPrint;
use jirapi::{
    add_comment, add_version_to_issue, get_versions, issues_assigned_to, search, user_activity,
    Comment, Create, Get, Issue, IssueRef, JiraClient, SearchQuery, SearchResult, Version,
};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let client = match cli.connection.to_config().and_then(JiraClient::new) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set JIRA_URL, JIRA_LOGIN and JIRA_PASSWORD environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &JiraClient, command: Command, json: bool) -> jirapi::Result<()> {
    match command {
        Command::Search { jql, window } => {
            let result = search(client, &jql, &SearchQuery::from(window)).await?;
            output_search(&result, json)
        }
        Command::Assigned { user, window } => {
            let result = issues_assigned_to(client, &user, &SearchQuery::from(window)).await?;
            output_search(&result, json)
        }
        Command::Get { key } => {
            let issue = Issue::get(client, key).await?;
            output_single(&issue, json)
        }
        Command::Comment { key, body } => {
            let stored = add_comment(client, &key, &Comment::new(body)).await?;
            output_single(&stored, json)
        }
        Command::Versions { project } => {
            let versions = get_versions(client, &project).await?;
            output_list(&versions, json, |v| VersionRow::from(v))
        }
        Command::CreateVersion {
            project,
            name,
            description,
        } => {
            let mut version = Version::new(project, name);
            version.description = description;
            let created = version.create(client).await?;
            output_single(&created, json)
        }
        Command::AddVersion { key, version_id } => {
            let issue = IssueRef {
                key: key.clone(),
                ..Default::default()
            };
            let version = Version {
                id: Some(version_id.clone()),
                ..Default::default()
            };
            add_version_to_issue(client, &issue, &version).await?;
            if !json {
                println!("Added version {version_id} to {key}");
            }
            Ok(())
        }
        Command::Activity { user } => {
            let feed = user_activity(client, &user).await?;
            output_single(&feed, json)
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> jirapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> jirapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

fn output_search(result: &SearchResult, json: bool) -> jirapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        let rows: Vec<IssueRow> = result.iter().map(IssueRow::from).collect();
        println!("{}", Table::new(rows));
        println!("\n{}", result.pretty_print());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct IssueRow {
    key: String,
    #[tabled(rename = "type")]
    issue_type: String,
    assignee: String,
    summary: String,
}

impl From<&Issue> for IssueRow {
    fn from(i: &Issue) -> Self {
        let fields = i.fields.as_ref();
        Self {
            key: i.key_or_id().unwrap_or_default().to_string(),
            issue_type: fields
                .and_then(|f| f.issue_type.as_ref())
                .and_then(|t| t.name.clone())
                .unwrap_or_default(),
            assignee: fields
                .and_then(|f| f.assignee.as_ref())
                .and_then(|u| u.label())
                .unwrap_or_default()
                .to_string(),
            summary: i.summary().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct VersionRow {
    id: String,
    name: String,
    released: String,
    description: String,
}

impl From<&Version> for VersionRow {
    fn from(v: &Version) -> Self {
        Self {
            id: v.id.clone().unwrap_or_default(),
            name: v.name.clone(),
            released: if v.is_released() { "yes" } else { "no" }.to_string(),
            description: v.description.clone().unwrap_or_default(),
        }
    }
}
