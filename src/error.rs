use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriveError>;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("'{0}' is not an absolute path")]
    InvalidPath(String),
    /// A segment of the path has no matching child under its parent.
    #[error("path not found: '{path}' (no entry named '{segment}')")]
    PathNotFound { path: String, segment: String },
    /// Only raised under `AmbiguityPolicy::Refuse`.
    #[error("ambiguous path '{path}': {count} entries named '{segment}'")]
    AmbiguousName {
        path: String,
        segment: String,
        count: usize,
    },
    /// Only raised under `ParentPolicy::RefuseMultiple`.
    #[error("object '{id}' has {count} parents, refusing to pick one")]
    MultipleParents { id: String, count: usize },
    #[error("no object with id '{0}'")]
    NotFound(String),
    #[error("'{0}' is not a directory")]
    NotADirectory(String),
    #[error("failed to write listing: {0}")]
    Output(#[from] std::io::Error),
    #[error("store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),
}
