//! Progressive tax estimation.
//!
//! [`TaxEstimator`] implements marginal-bracket accumulation over a
//! jurisdiction's rate schedule:
//!
//! 1. Derive net income (`gross_income − expenses`; negative means a loss
//!    year and is never clamped).
//! 2. Resolve the bracket schedule through the [`BracketRegistry`], falling
//!    back to the default jurisdiction for unknown codes.
//! 3. Walk the bands in ascending order, taxing `min(remaining, band width)`
//!    in each until no income remains; the unbounded top band absorbs
//!    whatever is left.
//! 4. Apply the jurisdiction's surtax rule, if it has one.
//! 5. Derive effective rate, marginal rate, after-tax income, and the
//!    quarterly installment, rounding to cents only at this final step.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_engine::{BracketRegistry, TaxEstimateRequest, TaxEstimator};
//!
//! let registry = BracketRegistry::builtin();
//! let estimator = TaxEstimator::new(&registry);
//!
//! let estimate = estimator
//!     .estimate(&TaxEstimateRequest {
//!         gross_income: dec!(60000.00),
//!         expenses: dec!(10000.00),
//!         tax_year: 2023,
//!         jurisdiction: "US".to_string(),
//!     })
//!     .unwrap();
//!
//! // 11000 @ 10% + 33725 @ 12% + 5275 @ 22%
//! assert_eq!(estimate.income_tax, dec!(6307.50));
//! assert_eq!(estimate.marginal_rate, dec!(22));
//! assert_eq!(estimate.quarterly_payment, dec!(3343.13));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_currency;
use crate::models::{TaxBracket, TaxEstimate, TaxEstimateRequest};
use crate::registry::{BracketRegistry, RegistryError};

/// Errors that can occur while producing an estimate.
///
/// Out-of-range income is not an error (a loss year is meaningful input);
/// the only failure mode is reference-data integrity, which callers should
/// treat as fatal rather than as bad user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimatorError {
    /// The bracket registry failed its integrity checks.
    #[error("bracket registry is misconfigured: {0}")]
    Registry(#[from] RegistryError),
}

/// Stateless calculator over an injected bracket registry.
///
/// Pure function of its inputs and the registry's read-only tables; any
/// number of estimates may run concurrently against the same registry.
#[derive(Debug, Clone)]
pub struct TaxEstimator<'a> {
    registry: &'a BracketRegistry,
}

impl<'a> TaxEstimator<'a> {
    /// Creates an estimator backed by `registry`.
    pub fn new(registry: &'a BracketRegistry) -> Self {
        Self { registry }
    }

    /// Produces a [`TaxEstimate`] for the given request.
    ///
    /// The registry is validated on every call, so a missing or malformed
    /// bracket table surfaces as an error instead of a silent zero-tax
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`EstimatorError::Registry`] when the registry's reference
    /// data fails validation.
    pub fn estimate(
        &self,
        request: &TaxEstimateRequest,
    ) -> Result<TaxEstimate, EstimatorError> {
        self.registry.validate()?;

        let net_income = request.gross_income - request.expenses;

        let lookup = self
            .registry
            .lookup(&request.jurisdiction, request.tax_year)?;
        if lookup.used_fallback {
            warn!(
                requested = %request.jurisdiction,
                fallback = %lookup.schedule.jurisdiction,
                "unknown jurisdiction; estimating with the fallback bracket table"
            );
        }

        let (income_tax, marginal_rate) =
            accumulate_bracket_tax(&lookup.schedule.brackets, net_income);

        let effective_rate = if net_income > Decimal::ZERO {
            income_tax / net_income * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };

        let surtax = match &lookup.schedule.surtax {
            Some(rule) => rule.apply(net_income),
            None => Decimal::ZERO,
        };

        // Round each component once; totals are assembled from the rounded
        // parts so total_tax = income_tax + surtax and
        // after_tax_income = net_income - total_tax hold exactly.
        let net_income = round_currency(net_income);
        let income_tax = round_currency(income_tax);
        let surtax = round_currency(surtax);
        let total_tax = income_tax + surtax;

        Ok(TaxEstimate {
            net_income,
            income_tax,
            surtax,
            total_tax,
            after_tax_income: net_income - total_tax,
            effective_rate: round_currency(effective_rate),
            marginal_rate: round_currency(marginal_rate),
            quarterly_payment: round_currency(total_tax / Decimal::from(4)),
            used_fallback: lookup.used_fallback,
        })
    }
}

/// Walks the bands in ascending order and returns the accumulated income
/// tax at full precision, together with the rate of the last band that
/// received a positive taxable amount (zero when none did).
fn accumulate_bracket_tax(
    brackets: &[TaxBracket],
    net_income: Decimal,
) -> (Decimal, Decimal) {
    let mut remaining = net_income;
    let mut income_tax = Decimal::ZERO;
    let mut marginal_rate = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable = match bracket.band_width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };

        income_tax += taxable * bracket.rate / Decimal::ONE_HUNDRED;
        remaining -= taxable;

        if taxable > Decimal::ZERO {
            marginal_rate = bracket.rate;
        }
    }

    (income_tax, marginal_rate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use crate::registry::JurisdictionSchedule;

    use super::*;

    fn us_request(gross_income: Decimal, expenses: Decimal) -> TaxEstimateRequest {
        TaxEstimateRequest {
            gross_income,
            expenses,
            tax_year: 2023,
            jurisdiction: "US".to_string(),
        }
    }

    /// Two-band schedule for a synthetic jurisdiction with no surtax rule.
    fn offshore_schedule() -> JurisdictionSchedule {
        JurisdictionSchedule {
            jurisdiction: "ATLANTIS".to_string(),
            brackets: vec![
                TaxBracket {
                    lower_bound: dec!(0),
                    upper_bound: Some(dec!(20000)),
                    rate: dec!(5),
                },
                TaxBracket {
                    lower_bound: dec!(20000),
                    upper_bound: None,
                    rate: dec!(15),
                },
            ],
            surtax: None,
        }
    }

    /// Initializes tracing subscriber for tests that exercise logged paths.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // zero income / loss tests
    // =========================================================================

    #[test]
    fn zero_net_income_produces_zero_everything() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator.estimate(&us_request(dec!(0), dec!(0))).unwrap();

        assert_eq!(estimate.net_income, dec!(0));
        assert_eq!(estimate.income_tax, dec!(0.00));
        assert_eq!(estimate.surtax, dec!(0.00));
        assert_eq!(estimate.total_tax, dec!(0.00));
        assert_eq!(estimate.after_tax_income, dec!(0.00));
        assert_eq!(estimate.effective_rate, dec!(0));
        assert_eq!(estimate.marginal_rate, dec!(0));
        assert_eq!(estimate.quarterly_payment, dec!(0.00));
    }

    #[test]
    fn loss_year_propagates_negative_net_income() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(20000), dec!(30000)))
            .unwrap();

        assert_eq!(estimate.net_income, dec!(-10000));
        assert_eq!(estimate.income_tax, dec!(0.00));
        assert_eq!(estimate.surtax, dec!(0.00));
        assert_eq!(estimate.total_tax, dec!(0.00));
        // The loss flows through untouched rather than being clamped.
        assert_eq!(estimate.after_tax_income, dec!(-10000));
        assert_eq!(estimate.effective_rate, dec!(0));
        assert_eq!(estimate.marginal_rate, dec!(0));
    }

    #[test]
    fn expenses_equal_to_income_produce_zero_tax() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(45000), dec!(45000)))
            .unwrap();

        assert_eq!(estimate.net_income, dec!(0));
        assert_eq!(estimate.total_tax, dec!(0.00));
    }

    // =========================================================================
    // bracket accumulation tests (reference US table)
    // =========================================================================

    #[test]
    fn income_within_first_band_is_taxed_at_ten_percent() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(11000), dec!(0)))
            .unwrap();

        assert_eq!(estimate.income_tax, dec!(1100.00));
        assert_eq!(estimate.marginal_rate, dec!(10));
        assert_eq!(estimate.effective_rate, dec!(10.00));
    }

    #[test]
    fn income_spanning_three_bands_accumulates_per_band() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(50000), dec!(0)))
            .unwrap();

        // 11000 @ 10% + 33725 @ 12% + 5275 @ 22% = 1100 + 4047 + 1160.50
        assert_eq!(estimate.income_tax, dec!(6307.50));
        assert_eq!(estimate.marginal_rate, dec!(22));
        // 6307.50 / 50000 × 100 = 12.615, rounded half away from zero
        assert_eq!(estimate.effective_rate, dec!(12.62));
    }

    #[test]
    fn income_at_band_edge_does_not_touch_the_next_band() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(44725), dec!(0)))
            .unwrap();

        // 11000 @ 10% + 33725 @ 12%; the 22% band receives nothing.
        assert_eq!(estimate.income_tax, dec!(5147.00));
        assert_eq!(estimate.marginal_rate, dec!(12));
    }

    #[test]
    fn top_band_absorbs_remaining_income() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(1000000), dec!(0)))
            .unwrap();

        assert_eq!(estimate.income_tax, dec!(330336.00));
        assert_eq!(estimate.marginal_rate, dec!(37));
    }

    #[test]
    fn expenses_reduce_gross_income_before_bracketing() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let with_expenses = estimator
            .estimate(&us_request(dec!(60000), dec!(10000)))
            .unwrap();
        let flat = estimator
            .estimate(&us_request(dec!(50000), dec!(0)))
            .unwrap();

        assert_eq!(with_expenses, flat);
    }

    // =========================================================================
    // surtax tests
    // =========================================================================

    #[test]
    fn surtax_applies_to_positive_net_income() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(50000), dec!(0)))
            .unwrap();

        // 50000 × 14.13%
        assert_eq!(estimate.surtax, dec!(7065.00));
        assert_eq!(estimate.total_tax, dec!(13372.50));
        assert_eq!(estimate.after_tax_income, dec!(36627.50));
    }

    #[test]
    fn surtax_is_capped_at_the_income_ceiling() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(2000000), dec!(0)))
            .unwrap();

        // 160200 × 14.13% = 22636.26, not the uncapped 282600.
        assert_eq!(estimate.surtax, dec!(22636.26));
    }

    #[test]
    fn jurisdiction_without_surtax_rule_owes_none() {
        let mut registry = BracketRegistry::new("ATLANTIS");
        registry.register(offshore_schedule());
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&TaxEstimateRequest {
                gross_income: dec!(50000),
                expenses: dec!(0),
                tax_year: 2023,
                jurisdiction: "ATLANTIS".to_string(),
            })
            .unwrap();

        assert_eq!(estimate.surtax, dec!(0.00));
        // 20000 @ 5% + 30000 @ 15%
        assert_eq!(estimate.income_tax, dec!(5500.00));
        assert_eq!(estimate.total_tax, dec!(5500.00));
    }

    // =========================================================================
    // derived figure tests
    // =========================================================================

    #[test]
    fn quarterly_payment_is_a_quarter_of_total_tax() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        for gross in [dec!(11000), dec!(50000), dec!(95375), dec!(250000)] {
            let estimate = estimator.estimate(&us_request(gross, dec!(0))).unwrap();

            assert_eq!(
                estimate.quarterly_payment,
                round_currency(estimate.total_tax / Decimal::from(4)),
                "quarterly identity failed for gross income {gross}"
            );
        }
    }

    #[test]
    fn quarterly_payment_rounds_the_odd_cent() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let estimate = estimator
            .estimate(&us_request(dec!(50000), dec!(0)))
            .unwrap();

        // 13372.50 / 4 = 3343.125, rounded half away from zero
        assert_eq!(estimate.quarterly_payment, dec!(3343.13));
    }

    #[test]
    fn result_totals_satisfy_the_sum_invariants() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        for gross in [dec!(0), dec!(11000.33), dec!(50000.17), dec!(2000000)] {
            let estimate = estimator.estimate(&us_request(gross, dec!(0))).unwrap();

            assert_eq!(estimate.total_tax, estimate.income_tax + estimate.surtax);
            assert_eq!(
                estimate.after_tax_income,
                estimate.net_income - estimate.total_tax
            );
        }
    }

    #[test]
    fn total_tax_is_monotonic_in_net_income() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let mut previous = dec!(-1);
        for gross in [
            dec!(0),
            dec!(5000),
            dec!(11000),
            dec!(44725),
            dec!(95375),
            dec!(160200),
            dec!(231250),
            dec!(578125),
            dec!(900000),
        ] {
            let estimate = estimator.estimate(&us_request(gross, dec!(0))).unwrap();

            assert!(
                estimate.total_tax >= previous,
                "total tax decreased at gross income {gross}"
            );
            previous = estimate.total_tax;
        }
    }

    // =========================================================================
    // fallback and idempotence tests
    // =========================================================================

    #[test]
    fn unknown_jurisdiction_matches_default_jurisdiction_figures() {
        let _guard = init_test_tracing();
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let mut unknown = us_request(dec!(50000), dec!(0));
        unknown.jurisdiction = "FREEDONIA".to_string();

        let fallback = estimator.estimate(&unknown).unwrap();
        let direct = estimator
            .estimate(&us_request(dec!(50000), dec!(0)))
            .unwrap();

        assert!(fallback.used_fallback);
        assert!(!direct.used_fallback);
        assert_eq!(fallback.income_tax, direct.income_tax);
        assert_eq!(fallback.surtax, direct.surtax);
        assert_eq!(fallback.total_tax, direct.total_tax);
        assert_eq!(fallback.after_tax_income, direct.after_tax_income);
        assert_eq!(fallback.effective_rate, direct.effective_rate);
        assert_eq!(fallback.marginal_rate, direct.marginal_rate);
        assert_eq!(fallback.quarterly_payment, direct.quarterly_payment);
    }

    #[test]
    fn identical_requests_yield_identical_estimates() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);
        let request = us_request(dec!(87654.32), dec!(1234.56));

        let first = estimator.estimate(&request).unwrap();
        let second = estimator.estimate(&request).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn tax_year_does_not_change_current_tables() {
        let registry = BracketRegistry::builtin();
        let estimator = TaxEstimator::new(&registry);

        let mut early = us_request(dec!(50000), dec!(0));
        early.tax_year = 2020;
        let mut late = us_request(dec!(50000), dec!(0));
        late.tax_year = 2030;

        assert_eq!(
            estimator.estimate(&early).unwrap(),
            estimator.estimate(&late).unwrap()
        );
    }

    // =========================================================================
    // configuration error tests
    // =========================================================================

    #[test]
    fn empty_bracket_table_is_an_error_not_zero_tax() {
        let mut registry = BracketRegistry::new("XX");
        registry.register(JurisdictionSchedule {
            jurisdiction: "XX".to_string(),
            brackets: vec![],
            surtax: None,
        });
        let estimator = TaxEstimator::new(&registry);

        let result = estimator.estimate(&TaxEstimateRequest {
            gross_income: dec!(50000),
            expenses: dec!(0),
            tax_year: 2023,
            jurisdiction: "XX".to_string(),
        });

        assert_eq!(
            result,
            Err(EstimatorError::Registry(RegistryError::EmptyBrackets(
                "XX".to_string()
            )))
        );
    }

    #[test]
    fn unregistered_default_jurisdiction_is_an_error() {
        let mut registry = BracketRegistry::new("XX");
        registry.register(offshore_schedule());
        let estimator = TaxEstimator::new(&registry);

        let result = estimator.estimate(&TaxEstimateRequest {
            gross_income: dec!(50000),
            expenses: dec!(0),
            tax_year: 2023,
            jurisdiction: "NOWHERE".to_string(),
        });

        assert_eq!(
            result,
            Err(EstimatorError::Registry(
                RegistryError::UnknownDefaultJurisdiction("XX".to_string())
            ))
        );
    }

    #[test]
    fn malformed_bracket_table_is_an_error() {
        let mut schedule = offshore_schedule();
        schedule.brackets[1].lower_bound = dec!(25000); // gap after the first band
        let mut registry = BracketRegistry::new("ATLANTIS");
        registry.register(schedule);
        let estimator = TaxEstimator::new(&registry);

        let result = estimator.estimate(&TaxEstimateRequest {
            gross_income: dec!(50000),
            expenses: dec!(0),
            tax_year: 2023,
            jurisdiction: "ATLANTIS".to_string(),
        });

        assert_eq!(
            result,
            Err(EstimatorError::Registry(
                RegistryError::NonContiguousBrackets {
                    jurisdiction: "ATLANTIS".to_string(),
                    expected: dec!(20000),
                    found: dec!(25000),
                }
            ))
        );
    }
}
