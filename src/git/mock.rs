use crate::domain::ChangeRecord;
use crate::error::{MonotagError, Result};
use crate::git::{CommitInfo, OidIter, Repository, CURRENT_BRANCH};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

struct MockCommit {
    info: CommitInfo,
    parents: Vec<Oid>,
    /// Changes introduced relative to the first parent
    changes: Vec<ChangeRecord>,
    /// Insertion order; parents are always inserted before children
    sequence: usize,
}

/// Mock repository for testing without actual git operations
///
/// Commits must be added parents first. A diff between two commits is the
/// concatenation of the changes recorded along the first-parent line.
pub struct MockRepository {
    commits: HashMap<Oid, MockCommit>,
    tags: RefCell<Vec<(String, Option<Oid>)>>,
    branch_heads: HashMap<String, Oid>,
    current_branch: Option<String>,
    remotes: HashMap<String, String>,
    created_tag_suffix: Option<String>,
    pushed: RefCell<Vec<String>>,
    reads: Cell<usize>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            tags: RefCell::new(Vec::new()),
            branch_heads: HashMap::new(),
            current_branch: None,
            remotes: HashMap::new(),
            created_tag_suffix: None,
            pushed: RefCell::new(Vec::new()),
            reads: Cell::new(0),
        }
    }

    /// Deterministic commit id for tests
    pub fn oid(n: u8) -> Oid {
        // 20 bytes is always a valid SHA-1 length
        Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
    }

    /// Add a commit with its parents and the changes it introduces
    pub fn add_commit(
        &mut self,
        oid: Oid,
        summary: impl Into<String>,
        parents: &[Oid],
        changes: Vec<ChangeRecord>,
    ) {
        let sequence = self.commits.len();
        self.commits.insert(
            oid,
            MockCommit {
                info: CommitInfo {
                    id: oid,
                    summary: summary.into(),
                    author: "Test Author".to_string(),
                    time: 1_700_000_000 + sequence as i64 * 60,
                },
                parents: parents.to_vec(),
                changes,
                sequence,
            },
        );
    }

    /// Add a tag pointing at a commit
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.borrow_mut().push((name.into(), Some(oid)));
    }

    /// Add a tag that does not peel to a commit
    pub fn add_dangling_tag(&mut self, name: impl Into<String>) {
        self.tags.borrow_mut().push((name.into(), None));
    }

    /// Set a branch head; the first branch set becomes the current branch
    pub fn set_branch_head(&mut self, branch: impl Into<String>, oid: Oid) {
        let branch = branch.into();
        if self.current_branch.is_none() {
            self.current_branch = Some(branch.clone());
        }
        self.branch_heads.insert(branch, oid);
    }

    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Store created tags under `{name}{suffix}`, simulating a backend that renames tags
    pub fn mangle_created_tags(&mut self, suffix: impl Into<String>) {
        self.created_tag_suffix = Some(suffix.into());
    }

    /// Tags pushed so far
    pub fn pushed_tags(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }

    /// Number of commit lookups served so far
    pub fn commit_reads(&self) -> usize {
        self.reads.get()
    }

    fn commit(&self, oid: Oid) -> Result<&MockCommit> {
        self.reads.set(self.reads.get() + 1);
        self.commits
            .get(&oid)
            .ok_or_else(|| MonotagError::not_found(format!("commit {}", oid)))
    }

    fn ancestors(&self, start: Oid) -> HashSet<Oid> {
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(oid) = stack.pop() {
            if !seen.insert(oid) {
                continue;
            }
            if let Some(commit) = self.commits.get(&oid) {
                stack.extend(commit.parents.iter().copied());
            }
        }
        seen
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().iter().map(|(name, _)| name.clone()).collect())
    }

    fn peel_tag(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self
            .tags
            .borrow()
            .iter()
            .find(|(name, _)| name == tag_name)
            .and_then(|(_, oid)| *oid))
    }

    fn resolve_branch(&self, alias: &str) -> Result<Oid> {
        let branch = if alias == CURRENT_BRANCH {
            self.current_branch.as_deref().unwrap_or(alias)
        } else {
            alias
        };

        self.branch_heads
            .get(branch)
            .copied()
            .ok_or_else(|| MonotagError::not_found(format!("branch '{}'", alias)))
    }

    fn branch_name(&self, alias: &str) -> Result<String> {
        if alias == CURRENT_BRANCH {
            return self
                .current_branch
                .clone()
                .ok_or_else(|| MonotagError::not_found(format!("branch '{}'", alias)));
        }
        Ok(alias.to_string())
    }

    fn walk_range<'a>(&'a self, oldest: Option<Oid>, newest: Oid) -> Result<OidIter<'a>> {
        let hidden = oldest.map(|oid| self.ancestors(oid)).unwrap_or_default();

        let mut range: Vec<&MockCommit> = self
            .ancestors(newest)
            .into_iter()
            .filter(|oid| !hidden.contains(oid))
            .filter_map(|oid| self.commits.get(&oid))
            .collect();
        range.sort_by(|a, b| b.sequence.cmp(&a.sequence));

        let oids: Vec<Oid> = range.into_iter().map(|c| c.info.id).collect();
        Ok(Box::new(oids.into_iter().map(Ok)))
    }

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo> {
        Ok(self.commit(oid)?.info.clone())
    }

    fn first_parent(&self, oid: Oid) -> Result<Option<Oid>> {
        Ok(self.commit(oid)?.parents.first().copied())
    }

    fn diff_commits(&self, old: Option<Oid>, new: Oid) -> Result<Vec<ChangeRecord>> {
        let mut segments = Vec::new();
        let mut cursor = Some(new);
        while let Some(oid) = cursor {
            if Some(oid) == old {
                break;
            }
            let commit = self.commit(oid)?;
            segments.push(commit.changes.clone());
            cursor = commit.parents.first().copied();
        }

        Ok(segments.into_iter().rev().flatten().collect())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        self.remotes
            .get(remote)
            .map(|url| Some(url.clone()))
            .ok_or_else(|| MonotagError::not_found(format!("remote '{}'", remote)))
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, _message: &str) -> Result<String> {
        let stored = match &self.created_tag_suffix {
            Some(suffix) => format!("{}{}", name, suffix),
            None => name.to_string(),
        };

        let mut tags = self.tags.borrow_mut();
        if tags.iter().any(|(existing, _)| *existing == stored) {
            return Err(git2::Error::from_str(&format!("tag '{}' already exists", stored)).into());
        }
        tags.push((stored.clone(), Some(target)));
        Ok(stored)
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        if !self.remotes.contains_key(remote) {
            return Err(MonotagError::remote(format!("Cannot find remote: {}", remote)));
        }
        self.pushed
            .borrow_mut()
            .extend(tag_names.iter().map(|t| t.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChangeKind;

    fn linear_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        let (c1, c2, c3) = (
            MockRepository::oid(1),
            MockRepository::oid(2),
            MockRepository::oid(3),
        );
        repo.add_commit(c1, "first", &[], vec![ChangeRecord::at(ChangeKind::Added, "a")]);
        repo.add_commit(c2, "second", &[c1], vec![ChangeRecord::at(ChangeKind::Modified, "a")]);
        repo.add_commit(c3, "third", &[c2], vec![ChangeRecord::at(ChangeKind::Added, "b")]);
        repo.set_branch_head("main", c3);
        repo
    }

    #[test]
    fn test_mock_repository_branches() {
        let repo = linear_repo();
        assert_eq!(repo.resolve_branch("main").unwrap(), MockRepository::oid(3));
        assert_eq!(repo.resolve_branch("HEAD").unwrap(), MockRepository::oid(3));
        assert_eq!(repo.branch_name("HEAD").unwrap(), "main");
        assert!(repo.resolve_branch("develop").unwrap_err().is_not_found());
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("Api_1.0.0", MockRepository::oid(2));
        repo.add_dangling_tag("Api_0.9.0");

        assert_eq!(repo.list_tags().unwrap().len(), 2);
        assert_eq!(repo.peel_tag("Api_1.0.0").unwrap(), Some(MockRepository::oid(2)));
        assert_eq!(repo.peel_tag("Api_0.9.0").unwrap(), None);
        assert_eq!(repo.peel_tag("Api_2.0.0").unwrap(), None);
    }

    #[test]
    fn test_mock_walk_range_is_newest_first() {
        let repo = linear_repo();
        let oids: Vec<Oid> = repo
            .walk_range(Some(MockRepository::oid(1)), MockRepository::oid(3))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(oids, vec![MockRepository::oid(3), MockRepository::oid(2)]);
    }

    #[test]
    fn test_mock_diff_accumulates_first_parent_line() {
        let repo = linear_repo();
        let changes = repo
            .diff_commits(Some(MockRepository::oid(1)), MockRepository::oid(3))
            .unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::Modified);

        let root = repo.diff_commits(None, MockRepository::oid(1)).unwrap();
        assert_eq!(root, vec![ChangeRecord::at(ChangeKind::Added, "a")]);
    }

    #[test]
    fn test_mock_create_tag_rejects_duplicates() {
        let repo = linear_repo();
        let oid = MockRepository::oid(3);
        assert_eq!(repo.create_annotated_tag("Api_1.0.0", oid, "m").unwrap(), "Api_1.0.0");
        assert!(repo.create_annotated_tag("Api_1.0.0", oid, "m").is_err());
    }
}
