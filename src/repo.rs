//! Repository handle composing the project and tag catalogs.

use std::path::{Path, PathBuf};

use git2::Oid;
use semver::Version;
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::catalog::{ProjectCatalog, TagCatalog, TagChain};
use crate::config::{load_config, Config};
use crate::domain::{
    format_tag_name, ChangeFilter, ChangeRecord, ChangeSummary, ProjectInfo, Tag, VersionBump,
};
use crate::error::{MonotagError, Result};
use crate::git::{CommitInfo, Git2Repository, Repository};
use crate::remote_url::RepoUrl;
use crate::scan::{CommitScan, ScannedCommit};

/// An opened repository with its catalogs.
///
/// Both catalogs are built once in [Repo::from_backend] and reused for the
/// lifetime of the handle. Increments update the tag catalog in place.
pub struct Repo<R: Repository = Git2Repository> {
    backend: R,
    root: PathBuf,
    config: Config,
    projects: ProjectCatalog,
    tags: TagCatalog,
}

impl Repo<Git2Repository> {
    /// Open the git repository containing `path` and load its configuration.
    pub fn open(path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let backend = Git2Repository::open(path)?;
        let root = backend.workdir()?;
        let config = load_config(config_path, &root)?;
        Self::from_backend(backend, root, config, &CancellationToken::new())
    }
}

impl<R: Repository> Repo<R> {
    /// Build both catalogs over `backend`, with projects discovered under `root`.
    pub fn from_backend(
        backend: R,
        root: impl Into<PathBuf>,
        config: Config,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let root = root.into();
        let projects = ProjectCatalog::discover(&root, &config.projects)?;
        let tags = TagCatalog::build(&backend, cancel)?;

        info!(
            root = %root.display(),
            projects = projects.len(),
            "repository catalogs built"
        );

        Ok(Repo {
            backend,
            root,
            config,
            projects,
            tags,
        })
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All projects in catalog order.
    pub fn projects(&self) -> Vec<Project<'_, R>> {
        self.projects
            .all()
            .iter()
            .map(|info| Project { repo: self, info })
            .collect()
    }

    /// The project addressed by a name, an index, or `#index`.
    pub fn project(&self, key: &str) -> Result<Project<'_, R>> {
        let info = self.projects.resolve(key)?;
        Ok(Project { repo: self, info })
    }

    /// Projects matched by any key, in catalog order. No keys selects all.
    pub fn select<S: AsRef<str>>(&self, keys: &[S]) -> Vec<Project<'_, R>> {
        self.projects
            .select(keys)
            .into_iter()
            .map(|info| Project { repo: self, info })
            .collect()
    }

    /// Tip of the configured branch.
    pub fn branch_tip(&self) -> Result<Oid> {
        self.backend.resolve_branch(&self.config.git.branch)
    }

    /// Display name of the configured branch.
    pub fn branch_name(&self) -> Result<String> {
        self.backend.branch_name(&self.config.git.branch)
    }

    /// Web location of the configured remote, if it has one.
    pub fn repo_url(&self) -> Result<Option<RepoUrl>> {
        let url = match self.backend.remote_url(&self.config.git.remote) {
            Ok(url) => url,
            Err(MonotagError::NotFound(what)) => {
                debug!(remote = %what, "no remote to derive web links from");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(url.map(|url| RepoUrl::parse(&url, &self.config.remote.hosting_domains)))
    }

    /// Tag the branch tip with the next version of a project.
    ///
    /// The created tag is read back and parsed again; a mismatch is an
    /// invariant violation. On success it becomes the head of the project's chain.
    pub fn increment(&mut self, key: &str, bump: VersionBump) -> Result<Tag> {
        let (name, version) = {
            let project = self.project(key)?;
            (project.name().to_string(), project.next_version(bump)?)
        };

        let tag_name = format_tag_name(&name, &version);
        let target = self.branch_tip()?;
        let message = self.config.git.render_tag_message(&name, &version);

        let created = self
            .backend
            .create_annotated_tag(&tag_name, target, &message)?;
        info!(tag = %created, target = %target, bump = %bump, "created tag");

        let peeled = self.backend.peel_tag(&created)?.ok_or_else(|| {
            MonotagError::invariant(format!("created tag '{}' does not resolve to a commit", created))
        })?;

        let tag = Tag::parse(&created, peeled)
            .filter(|tag| tag.project == name && tag.version == version)
            .ok_or_else(|| {
                MonotagError::invariant(format!(
                    "created tag '{}' does not parse back to {}",
                    created, tag_name
                ))
            })?;

        self.tags.insert_head(tag.clone())?;
        Ok(tag)
    }

    /// Push a tag to the configured remote.
    pub fn push_tag(&self, tag: &Tag) -> Result<()> {
        self.backend
            .push_tags(&self.config.git.remote, &[tag.reference.as_str()])
    }
}

/// Options for [Project::status]
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Compare against the newest tag even when it is a prerelease
    pub include_prerelease: bool,
    /// Also scan the commits that touched the project
    pub with_commits: bool,
    pub cancel: CancellationToken,
}

/// State of a project between its latest tag and the branch tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStatus {
    pub project: ProjectInfo,
    pub branch: String,
    pub head: CommitInfo,
    pub latest: Option<Tag>,
    pub tagged_commit: Option<CommitInfo>,
    pub changes: Vec<ChangeRecord>,
    /// Empty unless commits were requested
    pub commits: Vec<ScannedCommit>,
}

impl ProjectStatus {
    pub fn summary(&self) -> ChangeSummary {
        ChangeSummary::from_changes(&self.changes)
    }
}

/// One project of a [Repo]: its directory scope and its tag chain.
pub struct Project<'r, R: Repository> {
    repo: &'r Repo<R>,
    info: &'r ProjectInfo,
}

impl<R: Repository> Clone for Project<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Repository> Copy for Project<'_, R> {}

impl<'r, R: Repository> Project<'r, R> {
    pub fn info(&self) -> &'r ProjectInfo {
        self.info
    }

    pub fn name(&self) -> &'r str {
        &self.info.name
    }

    pub fn directory(&self) -> &'r str {
        &self.info.directory
    }

    pub fn index(&self) -> usize {
        self.info.index
    }

    /// Versions of this project, newest first.
    pub fn tags(&self) -> &'r TagChain {
        self.repo.tags.chain(&self.info.name)
    }

    pub fn latest_tag(&self, include_prerelease: bool) -> Option<&'r Tag> {
        self.tags()
            .latest(include_prerelease)
            .map(|entry| entry.tag())
    }

    /// Version the next increment would create. Bumps from the chain head.
    pub fn next_version(&self, bump: VersionBump) -> Result<Version> {
        bump.apply(self.tags().head().map(|head| &head.tag().version))
    }

    pub fn change_filter(&self) -> ChangeFilter {
        ChangeFilter::new(self.info.directory.clone())
    }

    /// Changes under the project directory between two commits.
    pub fn tree_changes(&self, from: Oid, to: Oid) -> Result<Vec<ChangeRecord>> {
        let changes = self.repo.backend.diff_commits(Some(from), to)?;
        Ok(self.change_filter().apply(changes))
    }

    /// Commits between `oldest` and `newest` that touched the project.
    pub fn commits(
        &self,
        oldest: Option<Oid>,
        newest: Oid,
        cancel: CancellationToken,
    ) -> Result<CommitScan<'r, R>> {
        CommitScan::new(&self.repo.backend, self.change_filter(), oldest, newest, cancel)
    }

    /// Changes since the latest tag up to the configured branch tip.
    pub fn status(&self, options: &StatusOptions) -> Result<ProjectStatus> {
        let tip = self.repo.branch_tip()?;
        let head = self.repo.backend.commit_info(tip)?;
        let branch = self.repo.branch_name()?;

        let latest = self.latest_tag(options.include_prerelease);
        let (tagged_commit, changes, commits) = match latest {
            Some(tag) => {
                let tagged = self.repo.backend.commit_info(tag.target)?;
                let changes = self.tree_changes(tag.target, tip)?;
                let commits = if options.with_commits {
                    self.commits(Some(tag.target), tip, options.cancel.clone())?
                        .collect::<Result<Vec<_>>>()?
                } else {
                    Vec::new()
                };
                (Some(tagged), changes, commits)
            }
            None => (None, Vec::new(), Vec::new()),
        };

        Ok(ProjectStatus {
            project: self.info.clone(),
            branch,
            head,
            latest: latest.cloned(),
            tagged_commit,
            changes,
            commits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChangeKind;
    use crate::git::MockRepository;
    use std::fs;

    fn oid(n: u8) -> Oid {
        MockRepository::oid(n)
    }

    fn workspace(descriptors: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for descriptor in descriptors {
            let path = dir.path().join(descriptor);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn open(backend: MockRepository, dir: &tempfile::TempDir) -> Repo<MockRepository> {
        Repo::from_backend(backend, dir.path(), Config::default(), &CancellationToken::new())
            .unwrap()
    }

    fn backend() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit(oid(1), "init", &[], vec![ChangeRecord::at(ChangeKind::Added, "Api/Api.proj")]);
        repo.add_commit(
            oid(2),
            "touch api",
            &[oid(1)],
            vec![
                ChangeRecord::at(ChangeKind::Modified, "Api/a.cs"),
                ChangeRecord::at(ChangeKind::Added, "Web/w.ts"),
            ],
        );
        repo.set_branch_head("main", oid(2));
        repo.add_tag("Api_1.0.0", oid(1));
        repo.add_tag("Api_1.1.0-rc.1", oid(1));
        repo.add_tag("Web_0.1.0", oid(1));
        repo.add_tag("nightly", oid(2));
        repo
    }

    #[test]
    fn test_status_counts_changes_since_latest_tag() {
        let dir = workspace(&["Api/Api.proj", "Web/Web.proj", "Api.Tests/Api.Tests.proj"]);
        let repo = open(backend(), &dir);

        let names: Vec<_> = repo.projects().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Api", "Web"]);

        let status = repo.project("Api").unwrap().status(&StatusOptions::default()).unwrap();
        assert_eq!(status.latest.as_ref().unwrap().version.to_string(), "1.0.0");
        assert_eq!(status.summary().to_string(), "+0 ~1 -0 ±0 R0 C0");
        assert_eq!(status.branch, "main");
        assert_eq!(status.head.summary, "touch api");
        assert!(status.commits.is_empty());

        let options = StatusOptions {
            include_prerelease: true,
            with_commits: true,
            ..Default::default()
        };
        let status = repo.project("#0").unwrap().status(&options).unwrap();
        assert_eq!(status.latest.unwrap().version.to_string(), "1.1.0-rc.1");
        assert_eq!(status.commits.len(), 1);
        assert_eq!(status.commits[0].commit.summary, "touch api");
    }

    #[test]
    fn test_status_without_tag() {
        let dir = workspace(&["Api/Api.proj", "Docs/Docs.proj"]);
        let repo = open(backend(), &dir);

        let status = repo.project("Docs").unwrap().status(&StatusOptions::default()).unwrap();
        assert!(status.latest.is_none());
        assert!(status.tagged_commit.is_none());
        assert!(status.summary().is_empty());
    }

    #[test]
    fn test_unknown_key_is_not_found() {
        let dir = workspace(&["Api/Api.proj"]);
        let repo = open(backend(), &dir);
        assert!(repo.project("Nope").err().unwrap().is_not_found());
        assert!(repo.project("1").is_err());
    }

    #[test]
    fn test_increment_prepends_new_head() {
        let dir = workspace(&["Api/Api.proj", "Docs/Docs.proj"]);
        let mut repo = open(backend(), &dir);

        let tag = repo.increment("Api", VersionBump::Minor).unwrap();
        assert_eq!(tag.reference, "Api_1.2.0");
        assert_eq!(tag.target, oid(2));

        let second = repo.increment("Api", VersionBump::Patch).unwrap();
        assert_eq!(second.reference, "Api_1.2.1");

        let project = repo.project("Api").unwrap();
        let head = project.tags().head().unwrap();
        assert_eq!(head.tag(), &second);
        assert!(head.next().is_none());
        assert_eq!(head.previous().unwrap().tag(), &tag);
        assert_eq!(head.previous().unwrap().next().unwrap().tag(), &second);

        let first = repo.increment("Docs", VersionBump::Major).unwrap();
        assert_eq!(first.reference, "Docs_1.0.0");
    }

    #[test]
    fn test_increment_reparse_failure_is_invariant_violation() {
        let dir = workspace(&["Api/Api.proj"]);
        let mut backend = backend();
        backend.mangle_created_tags("_copy");
        let mut repo = open(backend, &dir);

        let err = repo.increment("Api", VersionBump::Patch).unwrap_err();
        assert!(matches!(err, MonotagError::InvariantViolation(_)));
        assert_eq!(repo.project("Api").unwrap().tags().len(), 2);
    }

    #[test]
    fn test_increment_overflow_creates_no_tag() {
        let dir = workspace(&["Api/Api.proj"]);
        let mut backend = backend();
        backend.add_tag("Api_18446744073709551615.0.0", oid(2));
        let before = backend.list_tags().unwrap();
        let mut repo = open(backend, &dir);

        let err = repo.increment("Api", VersionBump::Major).unwrap_err();
        assert!(matches!(err, MonotagError::Version(_)));
        assert_eq!(repo.backend().list_tags().unwrap(), before);
        assert_eq!(repo.project("Api").unwrap().tags().len(), 3);

        let tag = repo.increment("Api", VersionBump::Minor).unwrap();
        assert_eq!(tag.reference, "Api_18446744073709551615.1.0");
    }

    #[test]
    fn test_push_and_repo_url() {
        let dir = workspace(&["Api/Api.proj"]);
        let mut backend = backend();
        backend.add_remote("origin", "git@github.com:acme/mono.git");
        let mut repo = open(backend, &dir);

        let url = repo.repo_url().unwrap().unwrap();
        assert_eq!(url.https_url.as_deref(), Some("https://github.com/acme/mono"));

        let tag = repo.increment("Api", VersionBump::Patch).unwrap();
        repo.push_tag(&tag).unwrap();
        assert_eq!(tag.reference, "Api_1.1.1");
        assert_eq!(repo.backend().pushed_tags(), vec!["Api_1.1.1"]);
    }

    #[test]
    fn test_missing_remote_has_no_url() {
        let dir = workspace(&["Api/Api.proj"]);
        let repo = open(backend(), &dir);
        assert_eq!(repo.repo_url().unwrap(), None);
    }
}
