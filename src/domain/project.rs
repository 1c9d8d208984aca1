use std::path::{Path, PathBuf};

/// A project found by scanning for descriptor files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    /// Repository-relative directory, with a trailing `/`
    pub directory: String,
    /// Descriptor file, relative to the repository root
    pub descriptor: PathBuf,
    /// Position in the name-sorted catalog
    pub index: usize,
}

impl ProjectInfo {
    /// Derive a project from its descriptor path (relative to the repository root).
    ///
    /// Returns `None` when the path has no usable file stem.
    pub fn from_descriptor(descriptor: &Path) -> Option<Self> {
        let name = descriptor.file_stem()?.to_str()?.to_string();
        if name.is_empty() {
            return None;
        }

        let directory = match descriptor.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                let components: Vec<String> = parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                format!("{}/", components.join("/"))
            }
            _ => String::new(),
        };

        Some(ProjectInfo {
            name,
            directory,
            descriptor: descriptor.to_path_buf(),
            index: 0,
        })
    }

    /// Whether `key` is this project's name, index, or `#`-prefixed index.
    pub fn matches_key(&self, key: &str) -> bool {
        if key == self.name {
            return true;
        }
        let index = key.strip_prefix('#').unwrap_or(key);
        index == self.index.to_string()
    }

    /// `#{index}`
    pub fn label(&self) -> String {
        format!("#{}", self.index)
    }
}
