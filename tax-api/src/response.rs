//! JSON envelopes for the estimate endpoint.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tax_engine::{TaxEstimate, TaxEstimateRequest};

use crate::request::CallerProfile;
use crate::validation::{FieldError, ValidationFailure};

/// The `calculation` object of a successful estimate response.
///
/// Echoes the resolved inputs alongside the engine's figures so the client
/// can see exactly which defaults were applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculation {
    pub user_id: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_income: Decimal,
    pub tax_year: i32,
    pub country: String,
    pub income_tax: Decimal,
    pub self_employment_tax: Decimal,
    pub total_tax: Decimal,
    pub after_tax_income: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    pub quarterly_payment: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl TaxCalculation {
    /// Assembles the wire object from the resolved request and the engine's
    /// estimate. `calculated_at` is passed in so assembly itself stays
    /// deterministic and testable.
    pub fn from_estimate(
        profile: &CallerProfile,
        request: &TaxEstimateRequest,
        estimate: &TaxEstimate,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            income: request.gross_income,
            expenses: request.expenses,
            net_income: estimate.net_income,
            tax_year: request.tax_year,
            country: request.jurisdiction.clone(),
            income_tax: estimate.income_tax,
            self_employment_tax: estimate.surtax,
            total_tax: estimate.total_tax,
            after_tax_income: estimate.after_tax_income,
            effective_rate: estimate.effective_rate,
            marginal_rate: estimate.marginal_rate,
            quarterly_payment: estimate.quarterly_payment,
            calculated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateData {
    pub calculation: TaxCalculation,
}

/// Success envelope for `POST /tax/estimate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResponse {
    pub success: bool,
    pub message: String,
    pub data: EstimateData,
}

impl EstimateResponse {
    pub fn ok(calculation: TaxCalculation) -> Self {
        Self {
            success: true,
            message: "Tax estimate calculated successfully".to_string(),
            data: EstimateData { calculation },
        }
    }
}

/// Error envelope shared by validation failures and internal errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    /// 400 body listing every rejected field.
    pub fn validation(failure: &ValidationFailure) -> Self {
        Self {
            success: false,
            message: "Validation failed".to_string(),
            errors: failure.errors.clone(),
        }
    }

    /// 500 body for unexpected internal failures. Carries no detail.
    pub fn internal() -> Self {
        Self {
            success: false,
            message: "Server error calculating tax estimate".to_string(),
            errors: Vec::new(),
        }
    }
}
