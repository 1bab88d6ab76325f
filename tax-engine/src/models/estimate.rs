use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fully resolved inputs for a single tax estimate.
///
/// Built per call and discarded afterwards; defaults for optional request
/// fields are applied by the caller before this type is constructed.
/// `gross_income` may be negative to represent a loss year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimateRequest {
    pub gross_income: Decimal,
    pub expenses: Decimal,
    pub tax_year: i32,
    pub jurisdiction: String,
}

/// Result of one estimate. Immutable; currency figures and rates are
/// rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub net_income: Decimal,

    // Tax components. total_tax = income_tax + surtax holds exactly.
    pub income_tax: Decimal,
    pub surtax: Decimal,
    pub total_tax: Decimal,

    // Derived reporting figures.
    pub after_tax_income: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    pub quarterly_payment: Decimal,

    /// True when the requested jurisdiction was unknown and the default
    /// jurisdiction's schedule was used instead.
    pub used_fallback: bool,
}
