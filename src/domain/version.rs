use crate::error::{MonotagError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Separator between the component name and its version in a tag name.
pub const TAG_SEPARATOR: char = '_';

/// Parse a tag name of the form `{name}_{version}`.
///
/// The name must split into exactly two segments on `_`, the component must be
/// non-empty and the version must be a strict semantic version. Anything else
/// yields `None`; the tag namespace is shared with unrelated tags.
pub fn parse_tag_name(tag_name: &str) -> Option<(String, Version)> {
    let mut parts = tag_name.split(TAG_SEPARATOR);
    let name = parts.next()?;
    let version = parts.next()?;
    if parts.next().is_some() || name.is_empty() {
        return None;
    }

    let version = Version::parse(version).ok()?;
    Some((name.to_string(), version))
}

/// Format the tag name for a component version.
pub fn format_tag_name(name: &str, version: &Version) -> String {
    format!("{}{}{}", name, TAG_SEPARATOR, version)
}

/// Version bump type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Apply the bump to `current`, or to 0.0.0 when the project has no tags yet.
    ///
    /// Prerelease and build metadata are always cleared. A component already at
    /// `u64::MAX` cannot be bumped and yields a `Version` error.
    pub fn apply(self, current: Option<&Version>) -> Result<Version> {
        let (major, minor, patch) = current
            .map(|v| (v.major, v.minor, v.patch))
            .unwrap_or((0, 0, 0));

        let overflow = || {
            MonotagError::version(format!(
                "Cannot apply a {} bump to {}.{}.{}",
                self, major, minor, patch
            ))
        };

        let (major, minor, patch) = match self {
            VersionBump::Major => (major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            VersionBump::Minor => (major, minor.checked_add(1).ok_or_else(overflow)?, 0),
            VersionBump::Patch => (major, minor, patch.checked_add(1).ok_or_else(overflow)?),
        };

        Ok(Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        })
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

impl FromStr for VersionBump {
    type Err = MonotagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(MonotagError::version(format!(
                "Invalid bump '{}' - expected major, minor or patch",
                other
            ))),
        }
    }
}
