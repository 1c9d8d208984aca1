use crate::domain::{ChangeKind, ChangeRecord};
use crate::error::{MonotagError, Result};
use crate::git::{CommitInfo, OidIter, CURRENT_BRANCH};
use git2::{DiffDelta, DiffFindOptions, ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MonotagError::not_found(format!(
                "repository path '{}'",
                path.display()
            )));
        }

        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                MonotagError::not_found(format!("git repository at '{}'", path.display()))
            } else {
                MonotagError::Git(e)
            }
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree
    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| MonotagError::not_found("working directory (bare repository)"))
    }

    fn commit_tree(&self, oid: Oid) -> Result<git2::Tree<'_>> {
        Ok(self.repo.find_commit(oid)?.tree()?)
    }
}

fn delta_to_change(delta: DiffDelta<'_>) -> ChangeRecord {
    let path_of = |p: Option<&Path>| p.map(|p| p.to_string_lossy().replace('\\', "/"));
    let new_path = path_of(delta.new_file().path());
    let old_path = path_of(delta.old_file().path());

    let path = new_path.clone().or_else(|| old_path.clone()).unwrap_or_default();
    let old_path = old_path.or(new_path).unwrap_or_default();

    ChangeRecord::new(ChangeKind::from(delta.status()), old_path, path)
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn peel_tag(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        let reference = match self.repo.find_reference(&reference_name) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match reference.peel_to_commit() {
            Ok(commit) => Ok(Some(commit.id())),
            Err(e) => {
                debug!(tag = %tag_name, error = %e, "tag does not point at a commit");
                Ok(None)
            }
        }
    }

    fn resolve_branch(&self, alias: &str) -> Result<Oid> {
        let reference = if alias == CURRENT_BRANCH {
            self.repo.head()
        } else {
            self.repo.resolve_reference_from_short_name(alias)
        };

        let reference = reference.map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::UnbornBranch => {
                MonotagError::not_found(format!("branch '{}'", alias))
            }
            _ => MonotagError::Git(e),
        })?;

        Ok(reference.peel_to_commit()?.id())
    }

    fn branch_name(&self, alias: &str) -> Result<String> {
        if alias != CURRENT_BRANCH {
            return Ok(alias.to_string());
        }

        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::UnbornBranch => {
                MonotagError::not_found(format!("branch '{}'", alias))
            }
            _ => MonotagError::Git(e),
        })?;

        Ok(head.shorthand().unwrap_or(CURRENT_BRANCH).to_string())
    }

    fn walk_range<'a>(&'a self, oldest: Option<Oid>, newest: Oid) -> Result<OidIter<'a>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.push(newest)?;
        if let Some(oldest) = oldest {
            revwalk.hide(oldest)?;
        }

        Ok(Box::new(revwalk.map(|oid| oid.map_err(MonotagError::from))))
    }

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;

        let summary = commit.summary().unwrap_or("(empty message)").to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();

        Ok(CommitInfo {
            id: oid,
            summary,
            author,
            time: commit.time().seconds(),
        })
    }

    fn first_parent(&self, oid: Oid) -> Result<Option<Oid>> {
        let commit = self.repo.find_commit(oid)?;
        if commit.parent_count() == 0 {
            return Ok(None);
        }
        Ok(Some(commit.parent_id(0)?))
    }

    fn diff_commits(&self, old: Option<Oid>, new: Oid) -> Result<Vec<ChangeRecord>> {
        let old_tree = old.map(|oid| self.commit_tree(oid)).transpose()?;
        let new_tree = self.commit_tree(new)?;

        let mut diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)?;

        let mut find = DiffFindOptions::new();
        find.renames(true).copies(true);
        diff.find_similar(Some(&mut find))?;

        Ok(diff.deltas().map(delta_to_change).collect())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let remote = self.repo.find_remote(remote).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                MonotagError::not_found(format!("remote '{}'", remote))
            } else {
                MonotagError::Git(e)
            }
        })?;

        Ok(remote.url().map(|url| url.to_string()))
    }

    fn create_annotated_tag(&self, name: &str, target: Oid, message: &str) -> Result<String> {
        let object = self.repo.find_object(target, None)?;
        let tagger = self.repo.signature()?;

        let tag_oid = self.repo.tag(name, &object, &tagger, message, false)?;
        let tag = self.repo.find_tag(tag_oid)?;

        Ok(tag.name().unwrap_or(name).to_string())
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| MonotagError::remote(format!("Cannot find remote: {}", e)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push failed for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspecs: Vec<String> = tag_names
            .iter()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();

        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        remote
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| MonotagError::remote(format!("Push failed: {}", e)))?;

        Ok(())
    }
}
