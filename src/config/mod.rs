//! Policy Configuration
//!
//! Loads and manages the command policy from TOML files.
//! The policy is made of three ordered rule lists:
//! - Blocked patterns (literal substrings or `.*`-bearing regexes)
//! - Approval prefixes (commands that run only after a human confirms)
//! - Allowed commands (exact base commands or full-text prefixes)
//!
//! `DEFAULT_SECURITY_CONFIG` is built once and never mutated. Mode-specific
//! variants are derived from it with [`mode::for_mode`], which always copies.

pub mod mode;

use crate::errors::PolicyError;
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

pub use mode::{for_mode, OperationMode};

/// Maximum compiled regex size for user-supplied patterns.
const REGEX_SIZE_LIMIT: usize = 1 << 20; // 1 MB

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GATEKEEPER_CONFIG";

/// The process-wide default policy.
pub static DEFAULT_SECURITY_CONFIG: LazyLock<SecurityConfig> =
    LazyLock::new(SecurityConfig::default);

/// A single blocked-pattern rule, classified once when the config is built.
///
/// Serialized as its source text, so a config file lists plain strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockedPattern {
    /// Case-insensitive substring containment.
    Literal(String),
    /// Case-insensitive regex, tested against the raw sub-command.
    Regex { source: String, regex: Regex },
}

impl BlockedPattern {
    /// Classify and compile a pattern source.
    ///
    /// Sources containing `.*` are treated as regexes. A source that fails to
    /// compile yields `MalformedPattern`.
    pub fn compile(source: &str) -> std::result::Result<Self, PolicyError> {
        if !source.contains(".*") {
            return Ok(BlockedPattern::Literal(source.to_string()));
        }
        RegexBuilder::new(source)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map(|regex| BlockedPattern::Regex {
                source: source.to_string(),
                regex,
            })
            .map_err(|e| PolicyError::MalformedPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })
    }

    /// Like [`compile`](Self::compile), but a malformed regex degrades to a
    /// literal pattern so the text is still blocked by containment.
    pub fn new(source: &str) -> Self {
        match Self::compile(source) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to literal match for blocked pattern");
                BlockedPattern::Literal(source.to_string())
            }
        }
    }

    /// The pattern text as configured. Reported verbatim in block reasons.
    pub fn source(&self) -> &str {
        match self {
            BlockedPattern::Literal(s) => s,
            BlockedPattern::Regex { source, .. } => source,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, BlockedPattern::Regex { .. })
    }

    /// Test a sub-command against this rule.
    pub fn matches(&self, sub_command: &str) -> bool {
        match self {
            BlockedPattern::Literal(text) => sub_command
                .to_lowercase()
                .contains(&text.to_lowercase()),
            BlockedPattern::Regex { regex, .. } => regex.is_match(sub_command),
        }
    }
}

impl From<String> for BlockedPattern {
    fn from(source: String) -> Self {
        BlockedPattern::new(&source)
    }
}

impl From<&str> for BlockedPattern {
    fn from(source: &str) -> Self {
        BlockedPattern::new(source)
    }
}

impl From<BlockedPattern> for String {
    fn from(pattern: BlockedPattern) -> Self {
        match pattern {
            BlockedPattern::Literal(s) => s,
            BlockedPattern::Regex { source, .. } => source,
        }
    }
}

impl PartialEq for BlockedPattern {
    fn eq(&self, other: &Self) -> bool {
        self.is_regex() == other.is_regex() && self.source() == other.source()
    }
}

impl Eq for BlockedPattern {}

/// The three rule lists the policy engine evaluates.
///
/// List order is observable: the first matching blocked pattern is the one
/// reported in the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_allowed_commands")]
    pub allowed_commands: Vec<String>,
    #[serde(default = "default_blocked_patterns")]
    pub blocked_patterns: Vec<BlockedPattern>,
    #[serde(default = "default_require_approval_for")]
    pub require_approval_for: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_commands: default_allowed_commands(),
            blocked_patterns: default_blocked_patterns(),
            require_approval_for: default_require_approval_for(),
        }
    }
}

fn default_allowed_commands() -> Vec<String> {
    [
        "ls",
        "cat",
        "head",
        "tail",
        "grep",
        "rg",
        "find",
        "echo",
        "pwd",
        "wc",
        "sort",
        "uniq",
        "diff",
        "tree",
        "which",
        "node",
        "npm",
        "npx",
        "yarn",
        "pnpm",
        "tsc",
        "jest",
        "vitest",
        "eslint",
        "prettier",
        "cargo",
        "rustc",
        "python",
        "python3",
        "pytest",
        "go",
        "make",
        "git status",
        "git diff",
        "git log",
        "git show",
        "git branch",
        "git ls-files",
        "git rev-parse",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_blocked_patterns() -> Vec<BlockedPattern> {
    [
        "sudo",
        "rm -rf /",
        "rm -rf ~",
        "rm -rf *",
        ":(){",
        "mkfs",
        "dd if=",
        "> /dev/sd",
        "chmod .*777",
        "chown -r",
        "git push .*--force",
        "git push -f",
        "shutdown",
        "reboot",
    ]
    .iter()
    .map(|s| BlockedPattern::new(s))
    .collect()
}

fn default_require_approval_for() -> Vec<String> {
    [
        "rm ",
        "rmdir",
        "git push",
        "git reset",
        "git checkout",
        "git rebase",
        "git merge",
        "npm publish",
        "cargo publish",
        "chmod",
        "chown",
        "kill",
        "docker",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl SecurityConfig {
    /// Build a config from plain string lists, classifying blocked patterns.
    pub fn from_lists<A, B, R>(allowed: A, blocked: B, require_approval: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        B: IntoIterator,
        B::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            allowed_commands: drop_blank_allow_entries(
                allowed.into_iter().map(Into::into).collect(),
            ),
            blocked_patterns: blocked
                .into_iter()
                .map(|p| BlockedPattern::new(p.as_ref()))
                .collect(),
            require_approval_for: require_approval.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive the effective policy for an operation mode. Never mutates `self`.
    pub fn for_mode(&self, mode: OperationMode) -> Self {
        for_mode(mode, self)
    }

    /// Parse a TOML policy document. Missing lists fall back to the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).context("Failed to parse security config")?;
        config.allowed_commands =
            drop_blank_allow_entries(std::mem::take(&mut config.allowed_commands));
        for pattern in &config.blocked_patterns {
            if !pattern.is_regex() && pattern.source().contains(".*") {
                tracing::warn!(
                    pattern = pattern.source(),
                    "Blocked pattern loaded as literal after regex compile failure"
                );
            }
        }
        Ok(config)
    }

    /// Load the policy from `path`, or from the default locations.
    ///
    /// Without an explicit path the loader tries `$GATEKEEPER_CONFIG`,
    /// `./gatekeeper.toml` and `~/.config/gatekeeper/config.toml` in order,
    /// and falls back to [`DEFAULT_SECURITY_CONFIG`] when none exists.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            let content = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read security config from {}", p))?;
            return Self::from_toml_str(&content);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let content = std::fs::read_to_string(&env_path).with_context(|| {
                format!(
                    "Failed to read security config from {} (set via {})",
                    env_path, CONFIG_ENV_VAR
                )
            })?;
            return Self::from_toml_str(&content);
        }

        for candidate in default_config_paths() {
            if let Ok(content) = std::fs::read_to_string(&candidate) {
                tracing::debug!(path = %candidate.display(), "Loaded security config");
                return Self::from_toml_str(&content);
            }
        }

        tracing::debug!("No security config file found, using defaults");
        Ok(DEFAULT_SECURITY_CONFIG.clone())
    }
}

/// Blank allow entries would prefix-match every command.
fn drop_blank_allow_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| {
            let blank = entry.trim().is_empty();
            if blank {
                tracing::warn!("Ignoring empty entry in allowed_commands");
            }
            !blank
        })
        .collect()
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("gatekeeper.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/gatekeeper/config.toml"));
    }
    paths
}
