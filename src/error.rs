use thiserror::Error;

/// Unified error type for git-monotag operations
#[derive(Error, Debug)]
pub enum MonotagError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-monotag
pub type Result<T> = std::result::Result<T, MonotagError>;

impl MonotagError {
    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        MonotagError::NotFound(msg.into())
    }

    /// Create an invariant violation with context
    pub fn invariant(msg: impl Into<String>) -> Self {
        MonotagError::InvariantViolation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MonotagError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        MonotagError::Version(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        MonotagError::Remote(msg.into())
    }

    /// True for errors caused by a missing project, path or branch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MonotagError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonotagError::not_found("project 'Api'");
        assert_eq!(err.to_string(), "Not found: project 'Api'");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MonotagError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_from_git() {
        let err: MonotagError = git2::Error::from_str("bad object").into();
        assert!(err.to_string().starts_with("Git operation failed"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (MonotagError::not_found("x"), "Not found"),
            (MonotagError::invariant("x"), "Invariant violated"),
            (MonotagError::config("x"), "Configuration error"),
            (MonotagError::version("x"), "Version parsing error"),
            (MonotagError::remote("x"), "Remote operation failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(MonotagError::not_found("branch 'dev'").is_not_found());
        assert!(!MonotagError::invariant("tag").is_not_found());
    }
}
