//! Quote-aware splitting of a command line into sub-commands.

use regex::Regex;
use std::sync::LazyLock;

/// Leading `NAME=value` assignments in front of a command.
static ENV_ASSIGNMENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\w+=\S+\s+)*").expect("Invalid regex"));

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Split a command line on `|`, `;` and `&&` outside of quotes.
///
/// Segments are trimmed and empty segments dropped, so an empty,
/// whitespace-only or separator-only line yields an empty vector.
pub fn parse_commands(line: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut quote = Quote::None;
    let mut escaped = false;
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    // Separators are ASCII, so byte offsets from char_indices are safe slice bounds.
    while let Some((i, c)) = chars.next() {
        // An escape only keeps a quote or backslash literal; separators still split.
        if escaped {
            escaped = false;
            if matches!(c, '"' | '\'' | '\\') {
                continue;
            }
        }
        match c {
            '\\' => escaped = true,
            '\'' => {
                quote = match quote {
                    Quote::None => Quote::Single,
                    Quote::Single => Quote::None,
                    Quote::Double => Quote::Double,
                }
            }
            '"' => {
                quote = match quote {
                    Quote::None => Quote::Double,
                    Quote::Double => Quote::None,
                    Quote::Single => Quote::Single,
                }
            }
            '|' | ';' if quote == Quote::None => {
                push_segment(&mut commands, &line[start..i]);
                start = i + 1;
            }
            '&' if quote == Quote::None && matches!(chars.peek(), Some((_, '&'))) => {
                push_segment(&mut commands, &line[start..i]);
                chars.next();
                start = i + 2;
            }
            _ => {}
        }
    }

    if start < line.len() {
        push_segment(&mut commands, &line[start..]);
    }

    commands
}

fn push_segment(commands: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        commands.push(trimmed.to_string());
    }
}

/// The command word of a sub-command, skipping `NAME=value` prefixes.
///
/// Returns an empty string when nothing but assignments remain.
pub fn base_command(sub_command: &str) -> &str {
    let trimmed = sub_command.trim();
    let rest = ENV_ASSIGNMENT_PREFIX
        .find(trimmed)
        .map(|m| &trimmed[m.end()..])
        .unwrap_or(trimmed);
    rest.split_whitespace().next().unwrap_or("")
}
