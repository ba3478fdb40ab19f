//! Path containment checks against a declared project root.
//!
//! All reasoning is done on strings. Nothing here touches the filesystem,
//! so symlinks are not followed; this is an advisory gate ahead of the
//! file operation, not a sandbox.

use crate::errors::PolicyError;

/// Scratch space that is always reachable by absolute path.
const SCRATCH_ROOT: &str = "/tmp";

/// Locations rejected wherever they appear in a path, matched case-insensitively.
const SENSITIVE_SUBSTRINGS: &[&str] = &[
    "/etc/",
    ".ssh/",
    ".aws/",
    ".env",
    "credentials",
    "secrets",
    ".git/config",
];

/// Confines file access to a project root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: String,
}

impl PathGuard {
    pub fn new(project_root: &str) -> Self {
        Self {
            root: normalize_root(project_root),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn is_safe(&self, path: &str) -> bool {
        self.check(path).is_ok()
    }

    /// Check `path`, naming the first rule it violates.
    pub fn check(&self, path: &str) -> Result<(), PolicyError> {
        let normalized = normalize_separators(path);

        if normalized.starts_with('/')
            && !is_within(&normalized, &self.root)
            && !is_within(&normalized, SCRATCH_ROOT)
        {
            return Err(self.reject(path, "outside project root".to_string()));
        }

        if has_parent_segment(&normalized) {
            let resolved = resolve(&self.root, &normalized);
            if !is_within(&resolved, &self.root) {
                return Err(self.reject(
                    path,
                    format!("traversal escapes project root (resolves to {})", resolved),
                ));
            }
        }

        // Runs even when containment passed.
        let lower = normalized.to_lowercase();
        if let Some(hit) = SENSITIVE_SUBSTRINGS.iter().find(|s| lower.contains(*s)) {
            return Err(self.reject(path, format!("sensitive location {}", hit)));
        }

        Ok(())
    }

    fn reject(&self, path: &str, reason: String) -> PolicyError {
        tracing::warn!(path, root = %self.root, reason = %reason, "Path rejected");
        PolicyError::PathRejected {
            path: path.to_string(),
            reason,
        }
    }
}

/// True when `path` stays inside `project_root` and avoids sensitive locations.
pub fn is_safe(path: &str, project_root: &str) -> bool {
    PathGuard::new(project_root).is_safe(path)
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn normalize_root(root: &str) -> String {
    let normalized = normalize_separators(root);
    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() && normalized.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Segment-aware prefix test: `/a/bc` is not within `/a/b`.
fn is_within(path: &str, root: &str) -> bool {
    if root == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn has_parent_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "..")
}

/// Resolve `.` and `..` in `path` without consulting the filesystem.
///
/// Relative paths are walked from `root`, absolute ones from `/`. Popping past
/// the top leaves the accumulator empty. A root without a leading `/` (such
/// as `C:/work`) keeps that shape in the result.
fn resolve(root: &str, path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = if absolute {
        Vec::new()
    } else {
        root.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if absolute || root.starts_with('/') {
        format!("/{}", segments.join("/"))
    } else {
        segments.join("/")
    }
}
