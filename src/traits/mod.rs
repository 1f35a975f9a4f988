//! Trait definitions for Jira operations.
//!
//! Each entity type implements the traits it supports, encapsulating
//! endpoint differences in the implementations.

mod create;
mod get;

pub use create::Create;
pub use get::Get;
