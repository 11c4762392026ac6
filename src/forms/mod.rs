//! Form definitions backing the CRM routes.
//!
//! Entity dialogs post their draft types directly; this module holds the
//! remaining inputs.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod records;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid row id")]
    InvalidRowId,
}
