//! Jira API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types and
//! free functions in the model modules.

use std::sync::Arc;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::{Credentials, JiraConfig};
use crate::diagnostics::{Exchange, ExchangeObserver, FileDumpObserver, TracingObserver};
use crate::error::{JiraError, Result};

const USER_AGENT: &str = concat!("jirapi/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Low-level Jira API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get` and `Create` traits and the functions
/// re-exported at the crate root.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use jirapi::{Credentials, JiraClient, JiraConfig};
///
/// # fn example() -> jirapi::Result<()> {
/// // Create from environment variables
/// let client = JiraClient::from_env()?;
///
/// // Or configure manually
/// let config = JiraConfig::new("https://jira.example.com", Credentials::new("bot", "secret"));
/// let client = JiraClient::new(config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct JiraClient {
    http: Client,
    base_url: Arc<Url>,
    api_path: Arc<str>,
    activity_path: Arc<str>,
    credentials: Arc<Credentials>,
    observer: Arc<dyn ExchangeObserver>,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_path", &self.api_path)
            .field("login", &self.credentials.login)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Create a client from `JIRA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(JiraConfig::from_env()?)
    }

    /// Create a client with explicit credentials and default paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_credentials(base_url: &str, login: &str, password: &str) -> Result<Self> {
        Self::new(JiraConfig::new(base_url, Credentials::new(login, password)))
    }

    /// Create a new client from a configuration.
    ///
    /// The observer is a [`FileDumpObserver`] when `dump_dir` is set and a
    /// [`TracingObserver`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: JiraConfig) -> Result<Self> {
        let observer: Arc<dyn ExchangeObserver> = match &config.dump_dir {
            Some(dir) => Arc::new(FileDumpObserver::new(dir.clone())),
            None => Arc::new(TracingObserver),
        };
        Self::with_observer(config, observer)
    }

    /// Create a new client that reports every exchange to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn with_observer(config: JiraConfig, observer: Arc<dyn ExchangeObserver>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;

        if config.accept_invalid_certs {
            tracing::warn!(
                base_url = %base_url,
                "TLS certificate verification disabled for this Jira client"
            );
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.timeout)
            .build()
            .map_err(JiraError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            api_path: normalize_path(&config.api_path).into(),
            activity_path: normalize_path(&config.activity_path).into(),
            credentials: Arc::new(config.credentials),
            observer,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the REST API path prefix.
    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    /// Build a REST API URL: base URL + API path + `path`.
    ///
    /// `path` is appended verbatim; callers percent-encode user-supplied
    /// segments beforehand.
    pub fn api_url(&self, path: &str) -> Result<Url> {
        self.join(&self.api_path, path)
    }

    /// Build the activity-stream URL: base URL + activity path.
    pub fn activity_url(&self) -> Result<Url> {
        self.join(&self.activity_path, "")
    }

    fn join(&self, prefix: &str, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{prefix}{path}"))?)
    }

    /// Execute a request and return the raw (decompressed) response body.
    ///
    /// Basic authentication is attached to every request; a JSON content type
    /// is set when `body` is present. Non-success status codes are turned into
    /// errors by the response check.
    #[tracing::instrument(skip(self, url, body), fields(url = %url))]
    pub async fn execute(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .basic_auth(&self.credentials.login, Some(&self.credentials.password));

        if let Some(ref bytes) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
                .body(bytes.clone());
        }

        tracing::debug!(%method, "sending jira request");
        let response = request.send().await.map_err(JiraError::HttpError)?;
        let status = response.status();
        let retry_after = Self::retry_after(&response);

        let contents = response.bytes().await.map_err(JiraError::HttpError)?.to_vec();

        self.observer.observe(&Exchange {
            method: &method,
            url: &url,
            status,
            request_body: body.as_deref(),
            response_body: &contents,
        });

        Self::check_status(status, retry_after, &contents)?;
        Ok(contents)
    }

    /// Make a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let contents = self.execute(Method::GET, url, None).await?;
        Ok(serde_json::from_slice(&contents)?)
    }

    /// Send a JSON body and decode the JSON response.
    pub async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let encoded = serde_json::to_vec(body)?;
        let contents = self.execute(method, url, Some(encoded)).await?;
        Ok(serde_json::from_slice(&contents)?)
    }

    /// Send a JSON body to an endpoint that answers success with no content.
    ///
    /// # Errors
    ///
    /// Any non-empty response body is returned as [`JiraError::Rejected`].
    pub async fn send_expecting_empty<B>(&self, method: Method, url: Url, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let encoded = serde_json::to_vec(body)?;
        let contents = self.execute(method, url, Some(encoded)).await?;
        if contents.is_empty() {
            return Ok(());
        }
        Err(JiraError::Rejected(
            String::from_utf8_lossy(&contents).into_owned(),
        ))
    }

    fn retry_after(response: &Response) -> Option<u64> {
        response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Check response status and convert errors.
    fn check_status(status: StatusCode, retry_after: Option<u64>, body: &[u8]) -> Result<()> {
        if status.is_success() {
            return Ok(());
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(JiraError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(JiraError::RateLimited {
                retry_after_secs: retry_after,
            }),
            _ => Err(JiraError::ApiError {
                message: extract_error_message(status, body),
                status_code: Some(status.as_u16()),
            }),
        }
    }
}

/// Extract an error message from a failed response body.
///
/// Jira reports failures as `{"errorMessages": [...], "errors": {field: msg}}`.
fn extract_error_message(status: StatusCode, body: &[u8]) -> String {
    if body.is_empty() {
        return format!("HTTP {status}");
    }

    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        let mut messages: Vec<String> = json
            .get("errorMessages")
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(errors) = json.get("errors").and_then(|e| e.as_object()) {
            messages.extend(
                errors
                    .iter()
                    .filter_map(|(field, msg)| msg.as_str().map(|m| format!("{field}: {m}"))),
            );
        }

        if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
            messages.push(msg.to_string());
        }

        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    String::from_utf8_lossy(body).into_owned()
}

/// Ensure a path prefix starts with `/` and has no trailing `/`.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
