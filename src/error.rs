use std::fmt;

use thiserror::Error;

/// Failures raised at the tracker adapter boundary.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Issue Does Not Exist: {0}")]
    NotFound(String),
    #[error("Jira API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid Jira url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("Failed to decode Jira response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Workflow step whose confirmation payload is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Status,
    Assignee,
    Comment,
    CustomField,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Step::Status => "Failed to move status for Jira ticket",
            Step::Assignee => "Failed to move assignee for Jira ticket",
            Step::Comment => "Failed to add a comment on Jira ticket",
            Step::CustomField => "Failed to add a build links to Jira ticket",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("{0}")]
    Verification(Step),
}

/// Invalid or missing configuration. Always fatal, raised before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0}")]
    Missing(&'static str),
}
