use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// A submitted form was rejected before any write was attempted.
    #[error("{0}")]
    Form(String),
    /// A value violated a domain constraint.
    #[error("invalid value: {0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

impl From<TypeConstraintError> for ServiceError {
    fn from(value: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(value.to_string())
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
