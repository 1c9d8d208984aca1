//! Path-level change records and the per-project change filter.

use std::fmt;

/// Classification of a path-level change between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Unmodified,
    Ignored,
    Untracked,
    Unreadable,
    Conflicted,
}

impl ChangeKind {
    /// Whether the change alters the content of a project.
    pub fn is_semantic(self) -> bool {
        matches!(
            self,
            ChangeKind::Added
                | ChangeKind::Modified
                | ChangeKind::Deleted
                | ChangeKind::Renamed
                | ChangeKind::Copied
                | ChangeKind::TypeChanged
        )
    }
}

impl From<git2::Delta> for ChangeKind {
    fn from(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added => ChangeKind::Added,
            git2::Delta::Modified => ChangeKind::Modified,
            git2::Delta::Deleted => ChangeKind::Deleted,
            git2::Delta::Renamed => ChangeKind::Renamed,
            git2::Delta::Copied => ChangeKind::Copied,
            git2::Delta::Typechange => ChangeKind::TypeChanged,
            git2::Delta::Unmodified => ChangeKind::Unmodified,
            git2::Delta::Ignored => ChangeKind::Ignored,
            git2::Delta::Untracked => ChangeKind::Untracked,
            git2::Delta::Unreadable => ChangeKind::Unreadable,
            git2::Delta::Conflicted => ChangeKind::Conflicted,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Added => "Added",
            ChangeKind::Modified => "Modified",
            ChangeKind::Deleted => "Deleted",
            ChangeKind::Renamed => "Renamed",
            ChangeKind::Copied => "Copied",
            ChangeKind::TypeChanged => "TypeChanged",
            ChangeKind::Unmodified => "Unmodified",
            ChangeKind::Ignored => "Ignored",
            ChangeKind::Untracked => "Untracked",
            ChangeKind::Unreadable => "Unreadable",
            ChangeKind::Conflicted => "Conflicted",
        };
        f.pad(label)
    }
}

/// One entry of a diff between two commits.
///
/// Paths are repository-relative with `/` separators. For additions the old
/// path equals the new path, and likewise for deletions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: String,
    pub old_path: String,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn new(kind: ChangeKind, old_path: impl Into<String>, path: impl Into<String>) -> Self {
        ChangeRecord {
            path: path.into(),
            old_path: old_path.into(),
            kind,
        }
    }

    /// Shorthand for a change that keeps its path.
    pub fn at(kind: ChangeKind, path: impl Into<String>) -> Self {
        let path = path.into();
        ChangeRecord::new(kind, path.clone(), path)
    }

    /// `old > new` for moves, otherwise the path.
    pub fn display_path(&self) -> String {
        if self.path == self.old_path {
            self.path.clone()
        } else {
            format!("{} > {}", self.old_path, self.path)
        }
    }
}

/// Keeps semantic changes touching one project directory.
///
/// Both paths are checked, so a rename across two projects shows up in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    prefix: String,
}

impl ChangeFilter {
    /// `prefix` is a project directory and ends with `/` (or is empty for the root).
    pub fn new(prefix: impl Into<String>) -> Self {
        ChangeFilter {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, change: &ChangeRecord) -> bool {
        change.kind.is_semantic()
            && (change.path.starts_with(&self.prefix) || change.old_path.starts_with(&self.prefix))
    }

    pub fn apply(&self, changes: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
        changes.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Counts per semantic change kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub type_changed: usize,
    pub renamed: usize,
    pub copied: usize,
}

impl ChangeSummary {
    pub fn from_changes<'a>(changes: impl IntoIterator<Item = &'a ChangeRecord>) -> Self {
        let mut summary = ChangeSummary::default();
        for change in changes {
            match change.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Modified => summary.modified += 1,
                ChangeKind::Deleted => summary.deleted += 1,
                ChangeKind::TypeChanged => summary.type_changed += 1,
                ChangeKind::Renamed => summary.renamed += 1,
                ChangeKind::Copied => summary.copied += 1,
                _ => {}
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.added + self.modified + self.deleted + self.type_changed + self.renamed + self.copied
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} ~{} -{} \u{00B1}{} R{} C{}",
            self.added, self.modified, self.deleted, self.type_changed, self.renamed, self.copied
        )
    }
}
