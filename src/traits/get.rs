//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::JiraClient;
use crate::error::{JiraError, Result};

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier (an issue id such as `10042` or a key such as
/// `PROJ-7`).
///
/// # Example
///
/// ```ignore
/// use jirapi::{Get, Issue, JiraClient};
///
/// let client = JiraClient::from_env()?;
/// let issue = Issue::get(&client, "PROJ-7".to_string()).await?;
///
/// if Issue::find(&client, "PROJ-9999".to_string()).await?.is_none() {
///     println!("no such issue");
/// }
/// ```
#[async_trait]
pub trait Get: Sized + Send {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::NotFound`] if the server has no such entity, or
    /// another error if the request fails.
    async fn get(client: &JiraClient, id: Self::Id) -> Result<Self>;

    /// Fetch the entity by ID, treating "not found" as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a missing entity.
    async fn find(client: &JiraClient, id: Self::Id) -> Result<Option<Self>> {
        match Self::get(client, id).await {
            Ok(entity) => Ok(Some(entity)),
            Err(JiraError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
