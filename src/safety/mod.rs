//! Security and safety module
//!
//! This module contains the policy engine's checks:
//! - Command tokenization and rule classification
//! - Project-root path containment
//! - Secret redaction for captured output

pub mod checker;
pub mod path_validator;
pub mod redact;
pub mod rules;
pub mod tokenizer;

// Re-exports for convenience
pub use checker::{validate, CommandValidation, PolicyEngine};
pub use path_validator::{is_safe, PathGuard};
pub use redact::{sanitize, sanitize_json, REDACTED};
pub use tokenizer::{base_command, parse_commands};
