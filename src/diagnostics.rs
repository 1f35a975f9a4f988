//! Request/response diagnostics.
//!
//! Every exchange the client performs is handed to an [`ExchangeObserver`].
//! The default observer logs through `tracing`; [`FileDumpObserver`] keeps
//! the last request and response bodies on disk for inspection.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reqwest::{Method, StatusCode};
use url::Url;

/// File holding the most recent request body.
pub const LAST_REQUEST_FILE: &str = "last_body.txt";
/// File holding the most recent response body.
pub const LAST_RESPONSE_FILE: &str = "last_response.txt";

/// One completed request/response pair.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub status: StatusCode,
    pub request_body: Option<&'a [u8]>,
    pub response_body: &'a [u8],
}

/// Hook invoked after each exchange.
///
/// Observers must not fail the request; report problems through `tracing`.
pub trait ExchangeObserver: Send + Sync + fmt::Debug {
    fn observe(&self, exchange: &Exchange<'_>);
}

/// Logs exchanges at `trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExchangeObserver for TracingObserver {
    fn observe(&self, exchange: &Exchange<'_>) {
        tracing::trace!(
            method = %exchange.method,
            url = %exchange.url,
            status = exchange.status.as_u16(),
            request = %exchange.request_body.map(String::from_utf8_lossy).unwrap_or_default(),
            response = %String::from_utf8_lossy(exchange.response_body),
            "jira exchange"
        );
    }
}

/// Writes the last request body and last response body into a directory.
///
/// The request file is only rewritten when the request carried a body.
#[derive(Debug, Clone)]
pub struct FileDumpObserver {
    dir: PathBuf,
}

impl FileDumpObserver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, exchange: &Exchange<'_>) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        if let Some(body) = exchange.request_body {
            fs::write(self.dir.join(LAST_REQUEST_FILE), body)?;
        }
        fs::write(self.dir.join(LAST_RESPONSE_FILE), exchange.response_body)
    }
}

impl ExchangeObserver for FileDumpObserver {
    fn observe(&self, exchange: &Exchange<'_>) {
        TracingObserver.observe(exchange);
        if let Err(e) = self.write(exchange) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "failed to dump jira exchange");
        }
    }
}
