//! Field-level validation errors for the estimate endpoint.
//!
//! Bad input is rejected before the engine runs and reported as a list of
//! per-field errors in the 400 response body, one entry per failing field.

use serde::Serialize;
use thiserror::Error;

/// Earliest tax year the estimate endpoint accepts.
pub const MIN_TAX_YEAR: i32 = 2020;

/// Latest tax year the estimate endpoint accepts.
pub const MAX_TAX_YEAR: i32 = 2030;

/// One rejected request field, as it appears in the error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The request failed field validation; the engine never ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for {} field(s)", .errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}
