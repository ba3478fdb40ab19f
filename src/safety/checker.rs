//! Policy Engine - Command Validation
//!
//! Validates a shell command line before it is executed. The line is split
//! into sub-commands and each one is classified, left to right, with fixed
//! precedence:
//! - Blocked patterns veto the whole line
//! - Approval prefixes pause the line for a human decision
//! - Anything else must be on the allowlist
//!
//! The first decisive classification ends evaluation; later sub-commands are
//! never examined.

use crate::config::{OperationMode, SecurityConfig, DEFAULT_SECURITY_CONFIG};
use crate::errors::PolicyError;
use crate::safety::redact::sanitize;
use crate::safety::rules::{is_allowed, matches_blocked, requires_approval};
use crate::safety::tokenizer::{base_command, parse_commands};
use serde::{Deserialize, Serialize};

/// Verdict for one command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandValidation {
    pub allowed: bool,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Classification behind a refusal or gate; `None` when plainly allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation: Option<PolicyError>,
}

impl CommandValidation {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            requires_approval: false,
            reason: None,
            violation: None,
        }
    }

    fn deny(violation: PolicyError) -> Self {
        Self {
            allowed: false,
            requires_approval: false,
            reason: Some(violation.to_string()),
            violation: Some(violation),
        }
    }

    fn gate(command: &str) -> Self {
        let violation = PolicyError::RequiresApproval {
            command: command.to_string(),
        };
        Self {
            allowed: true,
            requires_approval: true,
            reason: Some(violation.to_string()),
            violation: Some(violation),
        }
    }

    /// True only when the command may run without any further step.
    pub fn is_clear(&self) -> bool {
        self.allowed && !self.requires_approval
    }

    /// Convert the verdict into a `Result` for `?` propagation.
    ///
    /// Approval gates are returned as `Err(RequiresApproval)` because the
    /// caller must not proceed until the gate is resolved.
    pub fn ensure_allowed(&self) -> Result<(), PolicyError> {
        match &self.violation {
            None if self.allowed => Ok(()),
            Some(v) => Err(v.clone()),
            None => Err(PolicyError::Config {
                message: self
                    .reason
                    .clone()
                    .unwrap_or_else(|| "Command refused".to_string()),
            }),
        }
    }
}

/// Validate a command line against `config`.
///
/// Never panics and never errors; every outcome is a [`CommandValidation`].
pub fn validate(line: &str, config: &SecurityConfig) -> CommandValidation {
    let commands = parse_commands(line);
    if commands.is_empty() {
        tracing::warn!("Refused empty command");
        return CommandValidation::deny(PolicyError::EmptyCommand);
    }

    for sub in &commands {
        if let Some(pattern) = matches_blocked(sub, &config.blocked_patterns) {
            tracing::warn!(
                command = %sanitize(sub),
                pattern = pattern.source(),
                "Command blocked"
            );
            return CommandValidation::deny(PolicyError::Blocked {
                pattern: pattern.source().to_string(),
            });
        }

        if requires_approval(sub, &config.require_approval_for) {
            tracing::info!(command = %sanitize(sub), "Command requires approval");
            return CommandValidation::gate(sub);
        }

        if !is_allowed(sub, &config.allowed_commands) {
            let base = base_command(sub);
            tracing::warn!(command = %sanitize(base), "Command not in allowlist");
            return CommandValidation::deny(PolicyError::NotAllowlisted {
                command: base.to_string(),
            });
        }
    }

    tracing::debug!(sub_commands = commands.len(), "Command allowed");
    CommandValidation::allow()
}

/// Owns the effective policy for one agent session.
///
/// Holds no mutable state, so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    config: SecurityConfig,
}

impl PolicyEngine {
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Default policy with the overlay for `mode` applied.
    pub fn for_mode(mode: OperationMode) -> Self {
        Self::new(DEFAULT_SECURITY_CONFIG.for_mode(mode))
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    pub fn validate(&self, line: &str) -> CommandValidation {
        validate(line, &self.config)
    }

    /// Validate and convert to a `Result` in one step.
    pub fn check(&self, line: &str) -> Result<(), PolicyError> {
        self.validate(line).ensure_allowed()
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SECURITY_CONFIG.clone())
    }
}
