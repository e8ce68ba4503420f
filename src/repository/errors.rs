use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No pooled connection could be obtained.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// A unique index rejected the write (slug or find-or-create race).
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    /// The row targeted by a write does not exist.
    #[error("record not found")]
    NotFound,
    /// A stored row could not be converted into a domain value.
    #[error("stored data failed validation: {0}")]
    ValidationError(String),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::Conflict(info.message().to_string())
            }
            DieselError::NotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(value: TypeConstraintError) -> Self {
        Self::ValidationError(value.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
