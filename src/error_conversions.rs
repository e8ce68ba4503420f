//! Error conversion glue between the layers.
//!
//! The domain layer must not depend on service or repository error types, so
//! every conversion into [`ServiceError`] lives here.

use crate::domain::types::TypeConstraintError;
use crate::forms::posts::PostFormError;
use crate::forms::taxonomy::TermFormError;
use crate::repository::RepositoryError;
use crate::services::ServiceError;

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            RepositoryError::NotFound => ServiceError::NotFound("record".to_string()),
            other => {
                log::error!("Repository failure: {other}");
                ServiceError::Internal
            }
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<PostFormError> for ServiceError {
    fn from(val: PostFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<TermFormError> for ServiceError {
    fn from(val: TermFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}
