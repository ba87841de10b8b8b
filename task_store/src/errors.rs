use paging_query::PagingError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Database error during {operation} on {table}: {message}")]
    DatabaseOperation {
        table: String,
        operation: String,
        message: String,
    },

    #[error("Paging error: {0}")]
    Paging(#[from] PagingError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid sort property: {0}")]
    InvalidSortProperty(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl StoreError {
    pub fn database_operation(table: &str, operation: &str, err: impl Display) -> Self {
        StoreError::DatabaseOperation {
            table: table.to_string(),
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }

    /// Attach table and operation context to a bare database error
    pub fn in_operation(self, table: &str, operation: &str) -> Self {
        match self {
            StoreError::DatabaseError(message) => Self::database_operation(table, operation, message),
            other => other,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}
