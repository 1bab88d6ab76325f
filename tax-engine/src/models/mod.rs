mod estimate;
mod surtax_rule;
mod tax_bracket;

pub use estimate::{TaxEstimate, TaxEstimateRequest};
pub use surtax_rule::SurtaxRule;
pub use tax_bracket::TaxBracket;
