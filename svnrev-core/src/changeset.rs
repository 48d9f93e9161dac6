//! Changesets and log entries
//!
//! A `LogEntry` is one row of repository history as delivered by the
//! log-query facade; a `Changeset` is the immutable result record built
//! from a visible entry. Paths in both are repository-relative and
//! slash-prefixed (e.g. `/trunk/lib/a.txt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of change a revision applied to one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAction {
    Added,
    Modified,
    Deleted,
    Replaced,
}

/// Copy/rename ancestry: the path was created by copying from another
/// path at an earlier revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySource {
    /// Repository-relative source path, slash-prefixed.
    pub path: String,
    /// Revision the copy was taken from.
    pub revision: u64,
}

/// One path's change record within a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathChange {
    pub action: ChangeAction,
    /// Present when the path was copied (or renamed) from elsewhere.
    pub copy_from: Option<CopySource>,
}

impl PathChange {
    pub fn new(action: ChangeAction) -> Self {
        Self {
            action,
            copy_from: None,
        }
    }

    pub fn copied(action: ChangeAction, from_path: impl Into<String>, from_revision: u64) -> Self {
        Self {
            action,
            copy_from: Some(CopySource {
                path: from_path.into(),
                revision: from_revision,
            }),
        }
    }
}

/// One row of version-control history.
///
/// A `None` timestamp means the caller lacks visibility into the full
/// entry details (e.g. partial read permissions on a subtree); such
/// entries are skipped for changeset construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub revision: u64,
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
    /// Repository-relative path -> change record, sorted for stable
    /// iteration.
    pub changed_paths: BTreeMap<String, PathChange>,
}

/// The atomic set of path changes, author, and timestamp associated
/// with one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    pub revision: u64,
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
    pub changes: BTreeMap<String, PathChange>,
}

impl Changeset {
    /// Build a changeset from a log entry.
    pub fn from_entry(entry: &LogEntry) -> Self {
        Self {
            revision: entry.revision,
            author: entry.author.clone(),
            timestamp: entry.timestamp,
            message: entry.message.clone(),
            changes: entry.changed_paths.clone(),
        }
    }

    /// Exact-match lookup of a change by repository-relative path.
    pub fn by_path(&self, path: &str) -> Option<&PathChange> {
        self.changes.get(path)
    }

    /// The lone change, when this revision touched exactly one path.
    pub fn single_change(&self) -> Option<(&String, &PathChange)> {
        if self.changes.len() == 1 {
            self.changes.iter().next()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry() -> LogEntry {
        let mut changed_paths = BTreeMap::new();
        changed_paths.insert(
            "/trunk/lib/a.txt".to_string(),
            PathChange::new(ChangeAction::Modified),
        );
        changed_paths.insert(
            "/trunk/lib/b.txt".to_string(),
            PathChange::copied(ChangeAction::Added, "/trunk/lib/a.txt", 41),
        );
        LogEntry {
            revision: 42,
            author: Some("alice".to_string()),
            timestamp: Some(Utc.with_ymd_and_hms(2014, 3, 1, 12, 0, 0).unwrap()),
            message: "touch a and b".to_string(),
            changed_paths,
        }
    }

    #[test]
    fn test_from_entry_copies_all_fields() {
        let entry = entry();
        let changeset = Changeset::from_entry(&entry);
        assert_eq!(changeset.revision, 42);
        assert_eq!(changeset.author.as_deref(), Some("alice"));
        assert_eq!(changeset.timestamp, entry.timestamp);
        assert_eq!(changeset.changes, entry.changed_paths);
    }

    #[test]
    fn test_by_path_is_exact_match() {
        let changeset = Changeset::from_entry(&entry());
        assert!(changeset.by_path("/trunk/lib/a.txt").is_some());
        assert!(changeset.by_path("/trunk/lib").is_none());
        assert!(changeset.by_path("/trunk/lib/a").is_none());
    }

    #[test]
    fn test_single_change() {
        let mut entry = entry();
        assert!(Changeset::from_entry(&entry).single_change().is_none());

        entry.changed_paths.remove("/trunk/lib/b.txt");
        let changeset = Changeset::from_entry(&entry);
        let (path, change) = changeset.single_change().unwrap();
        assert_eq!(path, "/trunk/lib/a.txt");
        assert_eq!(change.action, ChangeAction::Modified);
    }

    #[test]
    fn test_changeset_serialization() {
        let changeset = Changeset::from_entry(&entry());
        let json = serde_json::to_string(&changeset).unwrap();
        let back: Changeset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, changeset);
    }
}
