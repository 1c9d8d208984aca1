//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! backend, allowing for multiple implementations including real Git
//! repositories and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait, which defines the
//! operations git-monotag needs. The concrete implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Everything except [Repository::create_annotated_tag] and
//! [Repository::push_tags] is a read.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::ChangeRecord;
use crate::error::Result;
use git2::Oid;

/// Alias resolving to the current branch.
pub const CURRENT_BRANCH: &str = "HEAD";

/// Commit information for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: Oid,
    /// First line of the commit message
    pub summary: String,
    pub author: String,
    /// Commit time, seconds since the Unix epoch
    pub time: i64,
}

impl CommitInfo {
    /// Abbreviated 7-character hash
    pub fn short_id(&self) -> String {
        let mut id = self.id.to_string();
        id.truncate(7);
        id
    }
}

/// Lazily produced commit ids.
pub type OidIter<'a> = Box<dyn Iterator<Item = Result<Oid>> + 'a>;

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Lookups of things the user
/// named (branches, remotes) map a missing object to
/// [crate::error::MonotagError::NotFound]; other backend failures surface as
/// [crate::error::MonotagError::Git].
pub trait Repository {
    /// Names of all tags, without the `refs/tags/` prefix.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit a tag points at, peeling annotated tags.
    ///
    /// # Returns
    /// * `Ok(Some(oid))` - The tag peels to a commit
    /// * `Ok(None)` - The tag is missing or points at something other than a commit
    fn peel_tag(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Tip commit of a branch. [CURRENT_BRANCH] resolves through `HEAD`.
    fn resolve_branch(&self, alias: &str) -> Result<Oid>;

    /// Human readable name of a branch alias (the checked out branch for `HEAD`).
    fn branch_name(&self, alias: &str) -> Result<String>;

    /// Commits reachable from `newest` but not from `oldest`, descendants first.
    ///
    /// With no `oldest` the whole history of `newest` is walked.
    fn walk_range<'a>(&'a self, oldest: Option<Oid>, newest: Oid) -> Result<OidIter<'a>>;

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo>;

    /// First parent of a commit, `None` for a root commit.
    fn first_parent(&self, oid: Oid) -> Result<Option<Oid>>;

    /// Path-level changes from `old` to `new`. No `old` compares against the empty tree.
    fn diff_commits(&self, old: Option<Oid>, new: Oid) -> Result<Vec<ChangeRecord>>;

    /// URL of a remote, `None` when the remote has no URL.
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    /// Create an annotated tag at `target` and return the name it was stored under.
    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<String>;

    /// Push tags to a remote.
    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()>;
}
