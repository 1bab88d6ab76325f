//! Estimate service: validation, engine invocation, envelope assembly.

use chrono::{Datelike, Utc};
use tax_engine::{BracketRegistry, EstimatorError, TaxEstimator};
use thiserror::Error;
use tracing::{debug, error};

use crate::request::{CallerProfile, EstimateRequestBody};
use crate::response::{ErrorResponse, EstimateResponse, TaxCalculation};
use crate::validation::ValidationFailure;

/// Failure modes of the estimate endpoint, split along the status boundary
/// the surrounding route maps them to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateServiceError {
    /// Bad input; the engine never ran.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// Reference-data integrity failure inside the engine.
    #[error(transparent)]
    Engine(#[from] EstimatorError),
}

impl EstimateServiceError {
    /// HTTP status the surrounding route should respond with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Engine(_) => 500,
        }
    }

    /// The matching error envelope body.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::Validation(failure) => ErrorResponse::validation(failure),
            Self::Engine(_) => ErrorResponse::internal(),
        }
    }
}

/// Runs one estimate for an authenticated caller: validates and defaults
/// the body, invokes the engine, and wraps the calculation in the success
/// envelope with a `calculatedAt` stamp.
///
/// # Errors
///
/// [`EstimateServiceError::Validation`] for per-field input errors,
/// [`EstimateServiceError::Engine`] when the bracket registry fails its
/// integrity checks.
pub fn estimate_for_caller(
    registry: &BracketRegistry,
    profile: &CallerProfile,
    body: &EstimateRequestBody,
) -> Result<EstimateResponse, EstimateServiceError> {
    let request = body.to_request(
        profile,
        registry.default_jurisdiction(),
        Utc::now().year(),
    )?;

    let estimator = TaxEstimator::new(registry);
    let estimate = estimator.estimate(&request).inspect_err(|err| {
        error!(user_id = %profile.user_id, %err, "tax estimate failed");
    })?;

    debug!(
        user_id = %profile.user_id,
        jurisdiction = %request.jurisdiction,
        tax_year = request.tax_year,
        "calculated tax estimate"
    );

    Ok(EstimateResponse::ok(TaxCalculation::from_estimate(
        profile,
        &request,
        &estimate,
        Utc::now(),
    )))
}
