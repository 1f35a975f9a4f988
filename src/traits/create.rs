//! Create trait for posting new entities.

use async_trait::async_trait;

use crate::client::JiraClient;
use crate::error::Result;

/// Create a new entity on the server.
///
/// The value itself is the request payload; `Output` is whatever the
/// endpoint echoes back (a full entity, or just a reference to it).
///
/// # Example
///
/// ```ignore
/// use jirapi::{Create, Issue, JiraClient};
///
/// let client = JiraClient::from_env()?;
/// let mut issue = Issue::new("PROJ", "Bug");
/// issue.fields_mut().summary = Some("Crash on start".to_string());
/// let created = issue.create(&client).await?;
/// println!("Created {}", created.key);
/// ```
#[async_trait]
pub trait Create: Sync {
    /// What the server returns for a successful creation.
    type Output;

    /// Send this entity to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    async fn create(&self, client: &JiraClient) -> Result<Self::Output>;
}
