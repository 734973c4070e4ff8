use crate::storage::StorageError;

/// Failures reported by design state mutations
#[derive(thiserror::Error, Debug)]
pub enum DesignError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type DesignResult<T> = Result<T, DesignError>;
