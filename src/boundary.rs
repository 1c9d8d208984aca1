use std::fmt;

/// Non-fatal conditions met while inspecting or tagging a project.
/// These are reported to the user and never abort a command.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Project has no tag yet; the first increment starts from 0.0.0
    NoTag { project: String },
    /// Nothing under the project directory changed since its latest tag
    NoChangesSinceTag {
        tag: String,
        current_commit_hash: String,
    },
    /// Remote URL could not be translated into a web URL
    NoWebUrl { remote: String },
    /// Tag was created but left local
    TagNotPushed { tag: String, remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoTag { project } => {
                write!(f, "Project '{}' has no tag yet", project)
            }
            BoundaryWarning::NoChangesSinceTag {
                tag,
                current_commit_hash,
            } => {
                let short_hash = if current_commit_hash.len() > 7 {
                    &current_commit_hash[..7]
                } else {
                    current_commit_hash.as_str()
                };
                write!(
                    f,
                    "No project changes since tag '{}' (current: {})",
                    tag, short_hash
                )
            }
            BoundaryWarning::NoWebUrl { remote } => {
                write!(f, "Remote '{}' has no known web URL", remote)
            }
            BoundaryWarning::TagNotPushed { tag, remote } => {
                write!(f, "Tag '{}' was not pushed to '{}'", tag, remote)
            }
        }
    }
}
