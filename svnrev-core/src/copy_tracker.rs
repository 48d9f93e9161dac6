//! Copy-path tracking across log entries
//!
//! Replays log entries newest-first and rewrites the tracked
//! repository-relative path whenever an entry shows that the path, or
//! one of its ancestor directories, was copied from elsewhere. After
//! replay the tracker holds the path's identity at the oldest visited
//! revision.

use tracing::debug;

use crate::changeset::LogEntry;
use crate::mapping::join_slashed;

/// Tracks one item's repository-relative path backward through copy
/// and rename history.
///
/// Entries must be fed newest-first: each copy record describes the
/// transition *into* its revision from an older path, so replaying in
/// descending revision order reconstructs the identity at the older
/// target revision. The tracker does not guard against out-of-order
/// input.
#[derive(Debug)]
pub struct CopyPathTracker {
    repository_url: String,
    current_path: String,
    rewritten: bool,
}

impl CopyPathTracker {
    /// `repo_relative_path` is slash-prefixed, e.g. `/trunk/lib/a.txt`.
    pub fn new(repository_url: impl Into<String>, repo_relative_path: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            current_path: repo_relative_path.into(),
            rewritten: false,
        }
    }

    /// Visit one log entry, rewriting the tracked path if the entry
    /// copied it (or an ancestor directory) from another location.
    pub fn accept(&mut self, entry: &LogEntry) {
        // With nested copies in one revision the deepest matching
        // ancestor describes the tracked path's own move.
        let mut best: Option<(&str, &str)> = None;
        for (changed_path, change) in &entry.changed_paths {
            let Some(source) = &change.copy_from else {
                continue;
            };
            if !is_ancestor_or_self(changed_path, &self.current_path) {
                continue;
            }
            if best.is_none_or(|(prev, _)| changed_path.len() > prev.len()) {
                best = Some((changed_path.as_str(), source.path.as_str()));
            }
        }

        if let Some((matched, source)) = best {
            let remainder = &self.current_path[matched.len()..];
            let new_path = format!("{}{}", source, remainder);
            debug!(
                revision = entry.revision,
                from = %self.current_path,
                to = %new_path,
                "copy record rewrites tracked path"
            );
            self.current_path = new_path;
            self.rewritten = true;
        }
    }

    /// Current best-known repository-relative path, or `None` when no
    /// rewrite ever occurred (the original address is still correct).
    pub fn repo_path(&self) -> Option<&str> {
        self.rewritten.then_some(self.current_path.as_str())
    }

    /// Absolute URL of the tracked path.
    pub fn url(&self) -> String {
        join_slashed(&self.repository_url, &self.current_path)
    }
}

/// Whether `ancestor` equals `path` or is an ancestor directory of it,
/// on path-component boundaries.
fn is_ancestor_or_self(ancestor: &str, path: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
