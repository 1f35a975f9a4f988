//! Client configuration.
//!
//! A [`JiraConfig`] names the tracker instance, the credentials used for
//! Basic authentication, and the opt-in knobs (TLS trust relaxation and
//! request/response dumps).

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{JiraError, Result};

pub const DEFAULT_API_PATH: &str = "/rest/api/2";
pub const DEFAULT_ACTIVITY_PATH: &str = "/activity";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_URL: &str = "JIRA_URL";
pub const ENV_LOGIN: &str = "JIRA_LOGIN";
pub const ENV_PASSWORD: &str = "JIRA_PASSWORD";
pub const ENV_API_PATH: &str = "JIRA_API_PATH";
pub const ENV_ACTIVITY_PATH: &str = "JIRA_ACTIVITY_PATH";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "JIRA_ACCEPT_INVALID_CERTS";
pub const ENV_DUMP_DIR: &str = "JIRA_DUMP_DIR";

/// Login and password sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials from a login and a password or API token.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

/// Settings for a [`JiraClient`](crate::JiraClient).
///
/// # Example
///
/// ```
/// use jirapi::{Credentials, JiraConfig};
///
/// let config = JiraConfig::new("https://jira.example.com", Credentials::new("bot", "secret"))
///     .with_api_path("/rest/api/latest")
///     .with_dump_dir("/tmp/jira-debug");
/// assert_eq!(config.api_path, "/rest/api/latest");
/// assert!(!config.accept_invalid_certs);
/// ```
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Instance root, e.g. `https://jira.example.com`.
    pub base_url: String,
    /// REST API prefix appended to `base_url`.
    pub api_path: String,
    /// Activity-stream path appended to `base_url`.
    pub activity_path: String,
    pub credentials: Credentials,
    /// Skip TLS certificate verification. Only for self-signed instances.
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
    /// When set, the last request and response bodies are written here.
    pub dump_dir: Option<PathBuf>,
}

impl JiraConfig {
    /// Create a configuration for `base_url` with default paths and timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Instance root, e.g. `https://jira.example.com`
    /// * `credentials` - Login and password for Basic authentication
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            activity_path: DEFAULT_ACTIVITY_PATH.to_string(),
            credentials,
            accept_invalid_certs: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dump_dir: None,
        }
    }

    /// Load configuration from `JIRA_*` environment variables.
    ///
    /// `JIRA_URL`, `JIRA_LOGIN` and `JIRA_PASSWORD` are required;
    /// `JIRA_API_PATH`, `JIRA_ACTIVITY_PATH`, `JIRA_ACCEPT_INVALID_CERTS` and
    /// `JIRA_DUMP_DIR` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::ConfigMissing`] if a required variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| JiraError::ConfigMissing(format!("{key} environment variable not set")))
        };

        let mut config = Self::new(
            required(ENV_URL)?,
            Credentials::new(required(ENV_LOGIN)?, required(ENV_PASSWORD)?),
        );

        if let Some(path) = lookup(ENV_API_PATH) {
            config.api_path = path;
        }
        if let Some(path) = lookup(ENV_ACTIVITY_PATH) {
            config.activity_path = path;
        }
        if let Some(flag) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            config.accept_invalid_certs = parse_flag(&flag);
        }
        config.dump_dir = lookup(ENV_DUMP_DIR).filter(|v| !v.is_empty()).map(PathBuf::from);

        Ok(config)
    }

    /// Override the REST API prefix (default `/rest/api/2`).
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    /// Override the activity-stream path (default `/activity`).
    pub fn with_activity_path(mut self, activity_path: impl Into<String>) -> Self {
        self.activity_path = activity_path.into();
        self
    }

    /// Opt in to accepting self-signed or otherwise invalid certificates.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the per-request timeout (default 300 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Write the last request and response bodies into `dir`.
    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = JiraConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://jira.example.com"),
            (ENV_LOGIN, "bot"),
            (ENV_PASSWORD, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://jira.example.com");
        assert_eq!(config.api_path, DEFAULT_API_PATH);
        assert_eq!(config.activity_path, DEFAULT_ACTIVITY_PATH);
        assert!(!config.accept_invalid_certs);
        assert!(config.dump_dir.is_none());
    }

    #[test]
    fn test_from_lookup_optional_values() {
        let config = JiraConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://jira.example.com"),
            (ENV_LOGIN, "bot"),
            (ENV_PASSWORD, "secret"),
            (ENV_API_PATH, "/rest/api/latest"),
            (ENV_ACTIVITY_PATH, "/plugins/activity"),
            (ENV_ACCEPT_INVALID_CERTS, "TRUE"),
            (ENV_DUMP_DIR, "/tmp/dumps"),
        ]))
        .unwrap();

        assert_eq!(config.api_path, "/rest/api/latest");
        assert_eq!(config.activity_path, "/plugins/activity");
        assert!(config.accept_invalid_certs);
        assert_eq!(config.dump_dir, Some(PathBuf::from("/tmp/dumps")));
    }

    #[test]
    fn test_from_lookup_missing_password() {
        let err = JiraConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://jira.example.com"),
            (ENV_LOGIN, "bot"),
        ]))
        .unwrap_err();

        assert!(matches!(err, JiraError::ConfigMissing(ref msg) if msg.contains(ENV_PASSWORD)));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("bot", "hunter2"));
        assert!(debug.contains("bot"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_builder_defaults_and_overrides() {
        let config = JiraConfig::new("https://jira.example.com", Credentials::new("bot", "secret"));
        assert_eq!(config.api_path, "/rest/api/2");
        assert_eq!(config.activity_path, "/activity");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(config.dump_dir.is_none());

        let config = config
            .with_api_path("/rest/api/latest")
            .with_activity_path("/plugins/activity")
            .with_timeout(Duration::from_secs(30))
            .with_dump_dir("/tmp/dumps");
        assert_eq!(config.credentials.login, "bot");
        assert_eq!(config.api_path, "/rest/api/latest");
        assert_eq!(config.activity_path, "/plugins/activity");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.dump_dir, Some(PathBuf::from("/tmp/dumps")));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
    }
}
