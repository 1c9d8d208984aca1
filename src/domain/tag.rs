use git2::Oid;
use semver::Version;
use std::fmt;

use super::version::{format_tag_name, parse_tag_name};

/// A version tag of one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Component name (the part before `_`)
    pub project: String,
    pub version: Version,
    /// Name of the underlying tag reference
    pub reference: String,
    /// Commit the tag points at, after peeling
    pub target: Oid,
}

impl Tag {
    /// Build a tag from a reference name and its peeled commit.
    ///
    /// Returns `None` when the name is not `{name}_{version}`.
    pub fn parse(reference: &str, target: Oid) -> Option<Self> {
        let (project, version) = parse_tag_name(reference)?;
        Some(Tag {
            project,
            version,
            reference: reference.to_string(),
            target,
        })
    }

    /// `{name}_{version}`
    pub fn display_name(&self) -> String {
        format_tag_name(&self.project, &self.version)
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
