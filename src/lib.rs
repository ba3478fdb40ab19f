//! Gatekeeper - Command & Resource Policy Engine
//!
//! The last line of defense between an LLM-driven worker and a host project.
//! Every shell command, file access and captured output blob passes through
//! here before it reaches the host or a human.
//!
//! - **Commands**: quote-aware splitting, block > approval > allowlist rules
//! - **Paths**: string-only containment under a declared project root
//! - **Output**: secret redaction before logging or display
//! - **Modes**: per-phase approval overlays on an immutable default policy
//!
//! # Quick Start
//!
//! ```
//! use gatekeeper::{is_safe, sanitize, OperationMode, PolicyEngine};
//!
//! let engine = PolicyEngine::for_mode(OperationMode::Coverage);
//! assert!(engine.validate("ls -la").allowed);
//! assert!(!engine.validate("npm test && sudo rm -rf /").allowed);
//!
//! assert!(is_safe("src/index.ts", "/home/user/project"));
//! assert_eq!(sanitize("password=hunter2"), "[REDACTED]");
//! ```

pub mod config;
pub mod errors;
pub mod safety;
pub mod telemetry;

pub use config::{
    for_mode, BlockedPattern, OperationMode, SecurityConfig, DEFAULT_SECURITY_CONFIG,
};
pub use errors::PolicyError;
pub use safety::{is_safe, sanitize, validate, CommandValidation, PathGuard, PolicyEngine};
