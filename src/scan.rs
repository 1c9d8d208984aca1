//! Commit range scanning scoped to one project directory.

use git2::Oid;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::domain::{ChangeFilter, ChangeRecord};
use crate::error::Result;
use crate::git::{CommitInfo, OidIter, Repository};

/// A commit that touched the project, with the changes that did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCommit {
    pub commit: CommitInfo,
    pub changes: Vec<ChangeRecord>,
}

/// Lazy, newest-first walk over the commits of a range that touch a project.
///
/// Every candidate is compared with its first parent only (the empty tree for a
/// root commit). Once the cancellation token is set the iterator ends without
/// reading anything else from the backend.
pub struct CommitScan<'a, R: Repository + ?Sized> {
    repo: &'a R,
    filter: ChangeFilter,
    walk: Option<OidIter<'a>>,
    cancel: CancellationToken,
}

impl<'a, R: Repository + ?Sized> CommitScan<'a, R> {
    /// Scan commits reachable from `newest` and not from `oldest`.
    pub fn new(
        repo: &'a R,
        filter: ChangeFilter,
        oldest: Option<Oid>,
        newest: Oid,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let walk = repo.walk_range(oldest, newest)?;
        Ok(CommitScan {
            repo,
            filter,
            walk: Some(walk),
            cancel,
        })
    }

    fn scan_commit(&self, oid: Oid) -> Result<Option<ScannedCommit>> {
        let parent = self.repo.first_parent(oid)?;
        let changes = self
            .filter
            .apply(self.repo.diff_commits(parent, oid)?);

        if changes.is_empty() {
            return Ok(None);
        }

        Ok(Some(ScannedCommit {
            commit: self.repo.commit_info(oid)?,
            changes,
        }))
    }
}

impl<R: Repository + ?Sized> Iterator for CommitScan<'_, R> {
    type Item = Result<ScannedCommit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_cancelled() {
                if self.walk.take().is_some() {
                    debug!("commit scan cancelled");
                }
                return None;
            }

            let oid = match self.walk.as_mut()?.next()? {
                Ok(oid) => oid,
                Err(e) => {
                    self.walk = None;
                    return Some(Err(e));
                }
            };

            match self.scan_commit(oid) {
                Ok(Some(scanned)) => return Some(Ok(scanned)),
                Ok(None) => continue,
                Err(e) => {
                    self.walk = None;
                    return Some(Err(e));
                }
            }
        }
    }
}
