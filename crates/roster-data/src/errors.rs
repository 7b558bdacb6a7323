use thiserror::Error as ThisError;

use crate::PersonId;

/// Input rejected before reaching the store
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,
    #[error("invalid identifier `{value}`: {reason}")]
    InvalidId { value: String, reason: String },
    #[error("entry #{index} is invalid: {source}")]
    InvalidEntry {
        index: usize,
        source: Box<ValidationError>,
    },
}

/// Failures reported by a store backend that callers may want
/// to tell apart from plain connectivity errors.
#[derive(Debug, Clone, ThisError)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),
}

#[derive(Debug, ThisError)]
pub enum FacadeError {
    #[error("validation failed :: {0}")]
    Validation(#[from] ValidationError),
    #[error("unable to find person `{0}`")]
    NotFound(PersonId),
    #[error("{0}")]
    Duplicate(String),
    #[error("store error :: {0}")]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for FacadeError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StoreError>() {
            Ok(StoreError::Duplicate(msg)) => FacadeError::Duplicate(msg),
            Err(err) => FacadeError::Store(err),
        }
    }
}
