/// Centralized error types for microannotate using thiserror
///
/// Provides domain-specific error types for better error handling and user-facing messages.
use thiserror::Error;

/// Main error type for microannotate
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors related to the source and destination repositories
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open git repository at '{path}': {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("Failed to initialize destination repository at '{path}': {reason}")]
    InitFailed { path: String, reason: String },

    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    #[error("Revision {start} is not an ancestor of {end}")]
    RevisionNotInRange { start: String, end: String },

    #[error("Destination repository already has commits: {0}")]
    DestinationNotEmpty(String),

    #[error("Destination repository is locked by another writer: {0}")]
    DestinationLocked(String),

    #[error("Failed to create commit: {0}")]
    CommitFailed(String),

    #[error(transparent)]
    Libgit2(#[from] git2::Error),
}

/// Errors raised while replaying a single revision
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Content of '{path}' is missing at revision {revision}")]
    ContentMissing { revision: String, path: String },

    #[error("Invalid path in revision {revision}: {path}")]
    InvalidPath { revision: String, path: String },
}

/// A [`Result`](std::result::Result) alias where the `Err` case is [`AnnotateError`].
pub type Result<T> = std::result::Result<T, AnnotateError>;

// Conversion from anyhow::Error to AnnotateError
impl From<anyhow::Error> for AnnotateError {
    fn from(err: anyhow::Error) -> Self {
        AnnotateError::Other(format!("{:#}", err))
    }
}

impl From<git2::Error> for AnnotateError {
    fn from(err: git2::Error) -> Self {
        AnnotateError::Git(GitError::Libgit2(err))
    }
}

impl AnnotateError {
    /// Check if this is a user error (bad range, bad config) vs system error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AnnotateError::Config(_)
                | AnnotateError::Git(
                    GitError::RevisionNotFound(_)
                        | GitError::RevisionNotInRange { .. }
                        | GitError::DestinationNotEmpty(_)
                )
        )
    }
}
