//! `POST /tax/estimate` request body and caller identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_engine::TaxEstimateRequest;

use crate::validation::{FieldError, MAX_TAX_YEAR, MIN_TAX_YEAR, ValidationFailure};

/// Authenticated caller identity, supplied by the session layer.
///
/// The profile country is the first fallback when the request body omits
/// `country`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerProfile {
    pub user_id: String,
    pub country: Option<String>,
}

/// Raw body of `POST /tax/estimate`, before validation and defaulting.
///
/// Only `income` is required. Optional fields are `None` when omitted and
/// receive their documented defaults in [`to_request`](Self::to_request).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequestBody {
    pub income: Option<Decimal>,
    pub expenses: Option<Decimal>,
    pub tax_year: Option<i32>,
    pub country: Option<String>,
}

impl EstimateRequestBody {
    /// Validates the body and resolves defaults into an engine request.
    ///
    /// Every failing field is reported, not just the first. Defaults:
    /// expenses zero, tax year `current_year`, country from the caller
    /// profile and then `default_jurisdiction`. An unrecognized but
    /// well-formed country code is valid input; the engine's fallback
    /// policy handles it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] listing each rejected field when
    /// income is missing, expenses are negative, the tax year is outside
    /// [`MIN_TAX_YEAR`]..=[`MAX_TAX_YEAR`], or a provided country is blank.
    pub fn to_request(
        &self,
        profile: &CallerProfile,
        default_jurisdiction: &str,
        current_year: i32,
    ) -> Result<TaxEstimateRequest, ValidationFailure> {
        let mut errors = Vec::new();

        if self.income.is_none() {
            errors.push(FieldError::new("income", "Income must be a number"));
        }
        if let Some(expenses) = self.expenses {
            if expenses < Decimal::ZERO {
                errors.push(FieldError::new("expenses", "Expenses must not be negative"));
            }
        }
        if let Some(tax_year) = self.tax_year {
            if !(MIN_TAX_YEAR..=MAX_TAX_YEAR).contains(&tax_year) {
                errors.push(FieldError::new("taxYear", "Invalid tax year"));
            }
        }
        if let Some(country) = &self.country {
            if country.trim().is_empty() {
                errors.push(FieldError::new("country", "Country must not be blank"));
            }
        }

        let Some(income) = self.income else {
            return Err(ValidationFailure { errors });
        };
        if !errors.is_empty() {
            return Err(ValidationFailure { errors });
        }

        let profile_country = profile
            .country
            .as_deref()
            .map(str::trim)
            .filter(|country| !country.is_empty());
        let jurisdiction = self
            .country
            .as_deref()
            .map(str::trim)
            .or(profile_country)
            .unwrap_or(default_jurisdiction)
            .to_string();

        Ok(TaxEstimateRequest {
            gross_income: income,
            expenses: self.expenses.unwrap_or(Decimal::ZERO),
            tax_year: self.tax_year.unwrap_or(current_year),
            jurisdiction,
        })
    }
}
