//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the jirapi binary.

use clap::{Args, Parser, Subcommand};

use crate::config::{Credentials, JiraConfig};
use crate::error::{JiraError, Result};
use crate::pagination::{SearchQuery, DEFAULT_MAX_RESULTS};

/// Jira command-line interface.
#[derive(Parser, Debug)]
#[command(name = "jirapi", about = "Jira API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests at debug level on stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: Connection,

    #[command(subcommand)]
    pub command: Command,
}

/// Where and how to connect.
#[derive(Args, Debug, Clone)]
pub struct Connection {
    /// Jira base URL.
    #[arg(long, env = "JIRA_URL", global = true)]
    pub url: Option<String>,

    /// Login for Basic authentication.
    #[arg(long, env = "JIRA_LOGIN", global = true)]
    pub login: Option<String>,

    /// Password or API token for Basic authentication.
    #[arg(long, env = "JIRA_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// REST API path prefix.
    #[arg(long, env = "JIRA_API_PATH", global = true, default_value = crate::config::DEFAULT_API_PATH)]
    pub api_path: String,

    /// Activity-stream path.
    #[arg(long, env = "JIRA_ACTIVITY_PATH", global = true, default_value = crate::config::DEFAULT_ACTIVITY_PATH)]
    pub activity_path: String,

    /// Accept invalid TLS certificates (self-signed instances only).
    #[arg(
        long,
        env = "JIRA_ACCEPT_INVALID_CERTS",
        global = true,
        default_value = "false",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub insecure: bool,

    /// Directory receiving the last request and response bodies.
    #[arg(long, env = "JIRA_DUMP_DIR", global = true)]
    pub dump_dir: Option<std::path::PathBuf>,
}

impl Connection {
    /// Turn the connection flags into a client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::ConfigMissing`] if the URL, login or password is absent.
    pub fn to_config(&self) -> Result<JiraConfig> {
        let missing = |what: &str, var: &str| {
            JiraError::ConfigMissing(format!("{what} not given (use --{what} or set {var})"))
        };
        let url = self.url.clone().ok_or_else(|| missing("url", "JIRA_URL"))?;
        let login = self.login.clone().ok_or_else(|| missing("login", "JIRA_LOGIN"))?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| missing("password", "JIRA_PASSWORD"))?;

        let mut config = JiraConfig::new(url, Credentials::new(login, password))
            .with_api_path(self.api_path.clone())
            .with_activity_path(self.activity_path.clone())
            .danger_accept_invalid_certs(self.insecure);
        if let Some(ref dir) = self.dump_dir {
            config = config.with_dump_dir(dir.clone());
        }
        Ok(config)
    }
}

/// Paging window shared by search commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct Window {
    /// Zero-based offset of the first result.
    #[arg(long, default_value = "0")]
    pub start_at: u32,

    /// Number of results per page.
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: u32,
}

impl From<Window> for SearchQuery {
    fn from(w: Window) -> Self {
        SearchQuery::window(w.start_at, w.max_results)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search issues with a JQL query.
    Search {
        /// The JQL query.
        jql: String,

        #[command(flatten)]
        window: Window,
    },

    /// List issues assigned to a user.
    Assigned {
        /// The assignee's login.
        user: String,

        #[command(flatten)]
        window: Window,
    },

    /// Get a single issue by key or id.
    Get {
        /// Issue key (e.g. PROJ-7) or numeric id.
        key: String,
    },

    /// Add a comment to an issue.
    Comment {
        /// Issue key.
        key: String,

        /// Comment text.
        body: String,
    },

    /// List the versions of a project.
    Versions {
        /// Project key.
        project: String,
    },

    /// Create a version in a project.
    CreateVersion {
        /// Project key.
        project: String,

        /// Version name.
        name: String,

        /// Version description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Add an existing version to an issue.
    AddVersion {
        /// Issue key.
        key: String,

        /// Version id.
        version_id: String,
    },

    /// Show a user's activity stream.
    Activity {
        /// The user's login.
        user: String,
    },
}
