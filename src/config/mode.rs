//! Operation modes and the approval overlay each one adds.

use super::SecurityConfig;
use crate::errors::PolicyError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The phase of work an agent session is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    /// Read-mostly exploration; state-mutating commands need approval
    Discovery,
    Coverage,
    Enhancement,
    /// Dependency upgrades; installs need approval
    Migration,
}

impl OperationMode {
    pub const ALL: [OperationMode; 4] = [
        OperationMode::Discovery,
        OperationMode::Coverage,
        OperationMode::Enhancement,
        OperationMode::Migration,
    ];

    /// Approval prefixes appended to the base policy in this mode.
    pub fn approval_overlay(self) -> &'static [&'static str] {
        match self {
            OperationMode::Discovery => {
                &["git add", "git commit", "mkdir", "touch", "cp ", "mv "]
            }
            OperationMode::Migration => &[
                "npm install",
                "npm i ",
                "yarn add",
                "pnpm add",
                "pip install",
                "cargo add",
            ],
            OperationMode::Coverage | OperationMode::Enhancement => &[],
        }
    }
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationMode::Discovery => write!(f, "discovery"),
            OperationMode::Coverage => write!(f, "coverage"),
            OperationMode::Enhancement => write!(f, "enhancement"),
            OperationMode::Migration => write!(f, "migration"),
        }
    }
}

impl FromStr for OperationMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discovery" => Ok(OperationMode::Discovery),
            "coverage" => Ok(OperationMode::Coverage),
            "enhancement" => Ok(OperationMode::Enhancement),
            "migration" => Ok(OperationMode::Migration),
            other => Err(PolicyError::Config {
                message: format!("Unknown operation mode: {}", other),
            }),
        }
    }
}

/// Derive the effective policy for `mode` from `base`.
///
/// Returns freshly allocated lists; `base` is only read. Overlay entries
/// already present in `base` are not duplicated.
pub fn for_mode(mode: OperationMode, base: &SecurityConfig) -> SecurityConfig {
    let overlay = mode.approval_overlay();
    let mut require_approval_for =
        Vec::with_capacity(base.require_approval_for.len() + overlay.len());
    require_approval_for.extend(base.require_approval_for.iter().cloned());
    for entry in overlay {
        if !require_approval_for.iter().any(|e| e == entry) {
            require_approval_for.push(entry.to_string());
        }
    }

    tracing::debug!(
        mode = %mode,
        added = require_approval_for.len() - base.require_approval_for.len(),
        "Derived security config for operation mode"
    );

    SecurityConfig {
        allowed_commands: base.allowed_commands.clone(),
        blocked_patterns: base.blocked_patterns.clone(),
        require_approval_for,
    }
}
