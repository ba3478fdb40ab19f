//! Rule predicates for a single sub-command.
//!
//! Each predicate scans its list in order and stops at the first hit.

use crate::config::BlockedPattern;
use crate::safety::tokenizer::base_command;

/// First blocked pattern that matches `sub_command`, if any.
pub fn matches_blocked<'a>(
    sub_command: &str,
    blocked_patterns: &'a [BlockedPattern],
) -> Option<&'a BlockedPattern> {
    blocked_patterns.iter().find(|p| p.matches(sub_command))
}

/// Case-insensitive prefix test against the approval list.
pub fn requires_approval<S: AsRef<str>>(sub_command: &str, approval_patterns: &[S]) -> bool {
    let lower = sub_command.to_lowercase();
    approval_patterns
        .iter()
        .any(|p| lower.starts_with(&p.as_ref().to_lowercase()))
}

/// Exact base-command match, or a case-insensitive prefix match for
/// multi-word entries such as `git status`.
pub fn is_allowed<S: AsRef<str>>(sub_command: &str, allowed_commands: &[S]) -> bool {
    let base = base_command(sub_command);
    let lower = sub_command.to_lowercase();
    allowed_commands.iter().any(|entry| {
        let entry = entry.as_ref();
        if entry.trim().is_empty() {
            return false;
        }
        base == entry || lower.starts_with(&entry.to_lowercase())
    })
}
