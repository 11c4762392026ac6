//! Workflows behind the HTTP routes.
//!
//! Services take the backend seams as generic parameters so they can be
//! exercised against the in-memory backend and mocks.

use thiserror::Error;
use validator::ValidationErrors;

use crate::backend::errors::BackendError;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;

pub mod auth_users;
pub mod dialogs;
pub mod records;
pub mod session;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User input was rejected; the message is shown back to the user.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Backend(BackendError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<BackendError> for ServiceError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound => ServiceError::NotFound,
            BackendError::Unauthorized(_) => ServiceError::Unauthorized,
            other => ServiceError::Backend(other),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Form(describe_validation_errors(&errors))
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ServiceError::from(errors),
            FormError::InvalidRowId => ServiceError::NotFound,
        }
    }
}

/// Flattens field errors into `field: code` pairs, sorted by field.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes = errs
                .iter()
                .map(|e| e.code.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{field}: {codes}")
        })
        .collect();
    fields.sort();
    format!("Invalid input ({})", fields.join("; "))
}
