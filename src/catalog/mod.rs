//! Catalogs built once per repository handle

pub mod projects;
pub mod tags;

pub use projects::ProjectCatalog;
pub use tags::{ChainEntry, TagCatalog, TagChain, TagQuery};
