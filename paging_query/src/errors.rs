use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PagingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid query specification: {0}")]
    InvalidQuerySpec(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported database: {0}")]
    UnsupportedDatabase(String),

    #[error("Resume row is missing sort key column: {0}")]
    MissingResumeKey(String),
}

impl PagingError {
    pub(crate) fn page_size(page_size: i64) -> Self {
        Self::InvalidArgument(format!(
            "page size must be greater than 0, got {}",
            page_size
        ))
    }

    pub(crate) fn item_index(item_index: i64) -> Self {
        Self::InvalidArgument(format!(
            "item index must not be negative, got {}",
            item_index
        ))
    }
}
