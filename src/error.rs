use thiserror::Error;

use crate::domain::result::ReviewAction;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure, non-success status, or missing versioned content.
    #[error("Failed to load configuration for sha \"{revision}\" - {reason}")]
    ConfigLoad { revision: String, reason: String },

    #[error("Failed to load configuration for sha \"{revision}\" - {reason}")]
    ConfigParse { revision: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No context details: {0}")]
    NoContext(String),

    #[error("Failed to {action} reviewers: {reason}")]
    Mutation { action: ReviewAction, reason: String },

    /// Malformed invocation inputs (headers, repository coordinates).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
