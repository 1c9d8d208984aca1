pub mod boundary;
pub mod cancel;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod remote_url;
pub mod repo;
pub mod scan;
pub mod ui;

pub use error::{MonotagError, Result};
pub use repo::{Project, ProjectStatus, Repo, StatusOptions};
