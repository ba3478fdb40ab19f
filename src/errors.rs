use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The central error type for the policy engine.
///
/// `validate`, `is_safe` and `sanitize` never return these directly; they are
/// total functions. The variants exist so callers can turn a verdict into a
/// `Result` and propagate it with `?`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Command matches blocked pattern: {pattern}")]
    Blocked { pattern: String },

    #[error("Command requires approval: {command}")]
    RequiresApproval { command: String },

    #[error("Command not in allowlist: {command}")]
    NotAllowlisted { command: String },

    #[error("Blocked pattern '{pattern}' is not a valid regex: {message}")]
    MalformedPattern { pattern: String, message: String },

    #[error("Path blocked by safety policy: {path} ({reason})")]
    PathRejected { path: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PolicyError {
    /// True for the approval gate, which is a pause rather than a refusal.
    pub fn is_approval_gate(&self) -> bool {
        matches!(self, PolicyError::RequiresApproval { .. })
    }
}

pub type Result<T> = std::result::Result<T, PolicyError>;
