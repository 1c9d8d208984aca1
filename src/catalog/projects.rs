//! Project discovery and key resolution.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ProjectsConfig;
use crate::domain::ProjectInfo;
use crate::error::{MonotagError, Result};

/// Projects of a repository, sorted by name. Index = position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCatalog {
    projects: Vec<ProjectInfo>,
}

impl ProjectCatalog {
    /// Scan `root` recursively for project descriptors.
    ///
    /// # Returns
    /// * `Ok(catalog)` - Possibly empty when no descriptors exist
    /// * `Err(NotFound)` - If `root` is missing or unreadable
    pub fn discover(root: &Path, config: &ProjectsConfig) -> Result<Self> {
        if !root.is_dir() {
            return Err(MonotagError::not_found(format!(
                "repository root '{}'",
                root.display()
            )));
        }

        let mut descriptors = Vec::new();
        collect_descriptors(root, root, config, &mut descriptors).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::PermissionDenied {
                MonotagError::not_found(format!("repository root '{}': {}", root.display(), e))
            } else {
                MonotagError::Io(e)
            }
        })?;
        descriptors.sort();

        let candidates = descriptors
            .iter()
            .filter_map(|path| ProjectInfo::from_descriptor(path))
            .filter(|project| {
                let reserved = config
                    .reserved_suffixes
                    .iter()
                    .any(|suffix| project.name.ends_with(suffix.as_str()));
                if reserved {
                    debug!(project = %project.name, "skipping project with reserved suffix");
                }
                !reserved
            });

        Ok(Self::from_projects(candidates))
    }

    /// Build a catalog from already known projects, assigning indices by name.
    ///
    /// When two projects share a name the first one wins.
    pub fn from_projects(projects: impl IntoIterator<Item = ProjectInfo>) -> Self {
        let mut seen = HashSet::new();
        let mut projects: Vec<ProjectInfo> = projects
            .into_iter()
            .filter(|project| {
                let fresh = seen.insert(project.name.clone());
                if !fresh {
                    warn!(
                        project = %project.name,
                        descriptor = %project.descriptor.display(),
                        "ignoring duplicate project name"
                    );
                }
                fresh
            })
            .collect();

        projects.sort_by(|a, b| a.name.cmp(&b.name));
        for (index, project) in projects.iter_mut().enumerate() {
            project.index = index;
        }

        ProjectCatalog { projects }
    }

    pub fn all(&self) -> &[ProjectInfo] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Find the project addressed by a name, an index, or `#index`.
    pub fn resolve(&self, key: &str) -> Result<&ProjectInfo> {
        self.projects
            .iter()
            .find(|project| project.matches_key(key))
            .ok_or_else(|| MonotagError::not_found(format!("project '{}'", key)))
    }

    /// Projects matched by any of `keys`, in catalog order. No keys selects all.
    pub fn select<S: AsRef<str>>(&self, keys: &[S]) -> Vec<&ProjectInfo> {
        if keys.is_empty() {
            return self.projects.iter().collect();
        }

        for key in keys {
            let key = key.as_ref();
            if !self.projects.iter().any(|project| project.matches_key(key)) {
                warn!(key = %key, "no project matches key");
            }
        }

        self.projects
            .iter()
            .filter(|project| keys.iter().any(|key| project.matches_key(key.as_ref())))
            .collect()
    }
}

/// Collect descriptor paths relative to `root`.
fn collect_descriptors(
    root: &Path,
    dir: &Path,
    config: &ProjectsConfig,
    found: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            if entry.file_name() == ".git" {
                continue;
            }
            collect_descriptors(root, &path, config, found)?;
        } else if file_type.is_file() && is_descriptor(&path, config) {
            if let Ok(relative) = path.strip_prefix(root) {
                found.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}

fn is_descriptor(path: &Path, config: &ProjectsConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            config
                .descriptor_suffixes
                .iter()
                .any(|suffix| ext.ends_with(suffix.as_str()))
        })
}
