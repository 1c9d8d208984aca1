//! Command workflows behind the `git-monotag` binary.
//!
//! The argument structs mirror the CLI but do not depend on clap, so the
//! workflows can be driven programmatically and from tests.

pub mod commands;

pub use commands::{run_increment, run_list, run_status, run_tags};

use semver::Version;

use crate::catalog::TagQuery;
use crate::domain::VersionBump;

/// Arguments for `tags`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagsArgs {
    /// Project keys; empty lists every project
    pub projects: Vec<String>,
    pub include_prerelease: bool,
    pub depth: Option<usize>,
    pub from: Option<Version>,
    pub to: Option<Version>,
}

impl TagsArgs {
    pub fn query(&self) -> TagQuery {
        TagQuery {
            include_prerelease: self.include_prerelease,
            depth: self.depth,
            min_version: self.from.clone(),
            max_version: self.to.clone(),
        }
    }
}

/// Arguments for `status`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusArgs {
    /// Project keys; empty reports every project
    pub projects: Vec<String>,
    pub include_prerelease: bool,
    /// Only the project line with its change summary
    pub summary_only: bool,
    pub show_files: bool,
    pub show_commits: bool,
    /// Offer an increment for every changed project
    pub interactive: bool,
}

/// Arguments for `increment`
#[derive(Debug, Clone, PartialEq)]
pub struct IncrementArgs {
    pub project: String,
    pub bump: VersionBump,
    /// Push without asking
    pub push: bool,
    /// Skip confirmation prompts
    pub yes: bool,
}
