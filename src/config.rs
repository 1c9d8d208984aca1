use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MonotagError, Result};

/// File name looked up at the repository root.
pub const REPO_CONFIG_FILE: &str = ".monotag.toml";

/// File name looked up in the user config directory.
pub const USER_CONFIG_FILE: &str = "git-monotag.toml";

/// Represents the complete configuration for git-monotag.
///
/// Contains project discovery rules, git defaults, and remote URL translation settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub projects: ProjectsConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Returns the default descriptor extension suffixes (`*.*proj`).
fn default_descriptor_suffixes() -> Vec<String> {
    vec!["proj".to_string()]
}

/// Returns the default reserved project name suffixes.
fn default_reserved_suffixes() -> Vec<String> {
    vec![
        "Test".to_string(),
        "Tests".to_string(),
        "Example".to_string(),
        "Examples".to_string(),
    ]
}

/// Project discovery rules.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectsConfig {
    /// A file is a project descriptor when its extension ends with one of these.
    #[serde(default = "default_descriptor_suffixes")]
    pub descriptor_suffixes: Vec<String>,

    /// Projects whose name ends with one of these are skipped.
    #[serde(default = "default_reserved_suffixes")]
    pub reserved_suffixes: Vec<String>,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        ProjectsConfig {
            descriptor_suffixes: default_descriptor_suffixes(),
            reserved_suffixes: default_reserved_suffixes(),
        }
    }
}

fn default_branch() -> String {
    "HEAD".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_message() -> String {
    "{name} {version}".to_string()
}

/// Git defaults used by status and increment.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Branch whose tip is compared and tagged; `HEAD` means the current branch.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Remote used for pushing tags and building web links.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Annotation message for created tags. Supports `{name}` and `{version}`.
    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            branch: default_branch(),
            remote: default_remote(),
            tag_message: default_tag_message(),
        }
    }
}

impl GitConfig {
    /// Render the annotation message for a new tag.
    pub fn render_tag_message(&self, name: &str, version: &semver::Version) -> String {
        self.tag_message
            .replace("{name}", name)
            .replace("{version}", &version.to_string())
    }
}

fn default_hosting_domains() -> Vec<String> {
    vec![
        "github.com".to_string(),
        "gitlab.com".to_string(),
        "bitbucket.org".to_string(),
    ]
}

/// Remote URL translation settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Hosts for which an SSH remote is translated to an https web URL.
    #[serde(default = "default_hosting_domains")]
    pub hosting_domains: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            hosting_domains: default_hosting_domains(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.monotag.toml` at the repository root
/// 3. `git-monotag.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a custom path is missing, or a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_root: &Path) -> Result<Config> {
    if let Some(path) = config_path {
        if !path.exists() {
            return Err(MonotagError::not_found(format!(
                "config file '{}'",
                path.display()
            )));
        }
        return parse_config_file(path);
    }

    let repo_config = repo_root.join(REPO_CONFIG_FILE);
    if repo_config.exists() {
        return parse_config_file(&repo_config);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(USER_CONFIG_FILE);
        if user_config.exists() {
            return parse_config_file(&user_config);
        }
    }

    Ok(Config::default())
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading config");
    toml::from_str(&config_str)
        .map_err(|e| MonotagError::config(format!("{}: {}", path.display(), e)))
}
