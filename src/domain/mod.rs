//! Domain logic - pure rules independent of git operations

pub mod change;
pub mod project;
pub mod tag;
pub mod version;

pub use change::{ChangeFilter, ChangeKind, ChangeRecord, ChangeSummary};
pub use project::ProjectInfo;
pub use tag::Tag;
pub use version::{format_tag_name, parse_tag_name, VersionBump};
