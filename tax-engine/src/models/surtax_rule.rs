use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A flat surtax layered on top of bracket-based income tax, such as the
/// self-employment tax of the default jurisdiction.
///
/// `rate` is a percentage in the range 0–100. Income above `income_ceiling`
/// does not attract any additional surtax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurtaxRule {
    pub rate: Decimal,
    pub income_ceiling: Decimal,
}

impl SurtaxRule {
    /// Surtax owed on `net_income`, at full precision.
    ///
    /// Zero for non-positive net income; capped at the ceiling otherwise.
    /// Rounding happens when the estimate result is produced, not here.
    pub fn apply(&self, net_income: Decimal) -> Decimal {
        if net_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        net_income.min(self.income_ceiling) * self.rate / Decimal::ONE_HUNDRED
    }
}
