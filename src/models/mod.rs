//! Jira API model types.

mod comment;
mod feed;
mod issue;
mod jql;
mod version;

pub use comment::*;
pub use feed::*;
pub use issue::*;
pub use jql::*;
pub use version::*;
