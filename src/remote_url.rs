//! Web URLs derived from a remote URL.

const SSH_PREFIX: &str = "git@";
const HTTPS_PREFIX: &str = "https://";

/// Web location of a repository, when one can be derived from its remote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoUrl {
    /// e.g. `https://github.com/owner/repo`
    pub https_url: Option<String>,
    /// e.g. `owner/repo`
    pub project_path: Option<String>,
}

impl RepoUrl {
    /// Translate a remote URL.
    ///
    /// `git@host:owner/repo.git` becomes `https://{domain}/owner/repo` when `host`
    /// contains one of `hosting_domains`. HTTPS remotes are used as they are.
    pub fn parse<S: AsRef<str>>(remote_url: &str, hosting_domains: &[S]) -> Self {
        let remote_url = remote_url.trim();

        if let Some(rest) = remote_url.strip_prefix(SSH_PREFIX) {
            let Some((host, path)) = rest.split_once(':') else {
                return RepoUrl::default();
            };
            let project_path = strip_git_suffix(path).to_string();
            if project_path.is_empty() {
                return RepoUrl::default();
            }

            let https_url = hosting_domains
                .iter()
                .map(|domain| domain.as_ref())
                .find(|domain| host.contains(*domain))
                .map(|domain| format!("{}{}/{}", HTTPS_PREFIX, domain, project_path));

            return RepoUrl {
                https_url,
                project_path: Some(project_path),
            };
        }

        if let Some(rest) = remote_url.strip_prefix(HTTPS_PREFIX) {
            let trimmed = strip_git_suffix(rest.trim_end_matches('/'));
            let project_path = trimmed
                .split_once('/')
                .map(|(_, path)| path.to_string())
                .filter(|path| !path.is_empty());

            return RepoUrl {
                https_url: Some(format!("{}{}", HTTPS_PREFIX, trimmed)),
                project_path,
            };
        }

        RepoUrl::default()
    }

    /// Link comparing two refs, when a web URL is known.
    pub fn compare_url(&self, from: &str, to: &str) -> Option<String> {
        self.https_url
            .as_ref()
            .map(|base| format!("{}/compare/{}...{}", base, from, to))
    }
}

fn strip_git_suffix(path: &str) -> &str {
    path.strip_suffix(".git").unwrap_or(path)
}
