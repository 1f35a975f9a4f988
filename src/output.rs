//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{ActivityFeed, Comment, Issue, SearchResult, Version};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Issue {
    fn pretty_print(&self) -> String {
        let header = format!("Issue: {}", self.key_or_id().unwrap_or("(unsaved)"));
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![header, divider];

        let Some(fields) = self.fields.as_ref() else {
            return lines.join("\n");
        };

        if let Some(ref summary) = fields.summary {
            lines.push(format!("Summary:        {}", summary));
        }

        if let Some(name) = fields.issue_type.as_ref().and_then(|t| t.name.as_deref()) {
            lines.push(format!("Type:           {}", name));
        }

        if let Some(key) = fields.project.as_ref().and_then(|p| p.key.as_deref()) {
            lines.push(format!("Project:        {}", key));
        }

        if let Some(name) = fields.reporter.as_ref().and_then(|u| u.label()) {
            lines.push(format!("Reporter:       {}", name));
        }

        if let Some(name) = fields.assignee.as_ref().and_then(|u| u.label()) {
            lines.push(format!("Assignee:       {}", name));
        }

        if let Some(created) = fields.created_at() {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S %z")));
        }

        if let Some(versions) = fields.versions.as_ref().filter(|v| !v.is_empty()) {
            let names: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
            lines.push(format!("Versions:       {}", names.join(", ")));
        }

        if let Some(ref description) = fields.description {
            lines.push(String::new());
            lines.push(description.clone());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Version {
    fn pretty_print(&self) -> String {
        let header = format!("Version: {}", self.name);
        let divider = "─".repeat(header.chars().count().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref id) = self.id {
            lines.push(format!("Id:             {}", id));
        }

        if let Some(ref project) = self.project {
            lines.push(format!("Project:        {}", project));
        }

        lines.push(format!(
            "Released:       {}",
            if self.is_released() { "yes" } else { "no" }
        ));

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Comment {
    fn pretty_print(&self) -> String {
        let author = self
            .author
            .as_ref()
            .and_then(|a| a.label())
            .unwrap_or("unknown");
        let header = format!("Comment {} by {}", self.id.as_deref().unwrap_or("-"), author);
        let divider = "─".repeat(header.chars().count().max(30));

        [header, divider, self.body.clone()].join("\n")
    }
}

impl PrettyPrint for SearchResult {
    fn pretty_print(&self) -> String {
        let p = &self.pagination;
        format!(
            "Page {}/{} ({} total issues, showing {} from offset {})",
            p.page + 1,
            p.page_count.max(1),
            self.total,
            self.issues.len(),
            self.start_at
        )
    }
}

impl PrettyPrint for ActivityFeed {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.title.chars().count().max(30));
        let mut lines = vec![self.title.clone(), divider];

        for entry in &self.entries {
            let when = entry
                .updated
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            lines.push(format!("{:<16} {}", when, entry.title));
        }

        lines.join("\n")
    }
}
