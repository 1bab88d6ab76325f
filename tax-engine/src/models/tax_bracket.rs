use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal band of a jurisdiction's rate schedule.
///
/// `upper_bound` is exclusive; `None` marks the unbounded top band.
/// `rate` is a percentage in the range 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    /// Width of the band, or `None` for the unbounded top band.
    pub fn band_width(&self) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - self.lower_bound)
    }
}
