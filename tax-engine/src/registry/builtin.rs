//! Built-in reference tables.

use rust_decimal_macros::dec;

use crate::models::{SurtaxRule, TaxBracket};

use super::{BracketRegistry, JurisdictionSchedule};

/// Jurisdiction unknown codes fall back to.
pub const DEFAULT_JURISDICTION: &str = "US";

impl BracketRegistry {
    /// Registry preloaded with the compiled-in reference tables.
    ///
    /// Currently a single schedule: the 2023 US federal single-filer
    /// brackets plus the self-employment surtax (14.13% of net income,
    /// capped at the 160,200 wage base). Every other jurisdiction code
    /// resolves to this schedule through the fallback policy.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::BracketRegistry;
    ///
    /// let registry = BracketRegistry::builtin();
    ///
    /// assert_eq!(registry.default_jurisdiction(), "US");
    /// assert_eq!(registry.registered_jurisdictions(), vec!["US"]);
    /// assert!(registry.validate().is_ok());
    /// ```
    pub fn builtin() -> Self {
        let mut registry = Self::new(DEFAULT_JURISDICTION);
        registry.register(JurisdictionSchedule {
            jurisdiction: DEFAULT_JURISDICTION.to_string(),
            brackets: vec![
                TaxBracket {
                    lower_bound: dec!(0),
                    upper_bound: Some(dec!(11000)),
                    rate: dec!(10),
                },
                TaxBracket {
                    lower_bound: dec!(11000),
                    upper_bound: Some(dec!(44725)),
                    rate: dec!(12),
                },
                TaxBracket {
                    lower_bound: dec!(44725),
                    upper_bound: Some(dec!(95375)),
                    rate: dec!(22),
                },
                TaxBracket {
                    lower_bound: dec!(95375),
                    upper_bound: Some(dec!(182050)),
                    rate: dec!(24),
                },
                TaxBracket {
                    lower_bound: dec!(182050),
                    upper_bound: Some(dec!(231250)),
                    rate: dec!(32),
                },
                TaxBracket {
                    lower_bound: dec!(231250),
                    upper_bound: Some(dec!(578125)),
                    rate: dec!(35),
                },
                TaxBracket {
                    lower_bound: dec!(578125),
                    upper_bound: None,
                    rate: dec!(37),
                },
            ],
            surtax: Some(SurtaxRule {
                rate: dec!(14.13),
                income_ceiling: dec!(160200),
            }),
        });
        registry
    }
}

impl Default for BracketRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
