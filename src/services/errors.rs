use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The input failed validation or violated a precondition.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A uniqueness or usage rule blocked the write.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A bounded search (such as slug probing) ran out of candidates.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
