pub mod calculations;
pub mod models;
pub mod registry;

pub use calculations::{EstimatorError, TaxEstimator};
pub use models::*;
pub use registry::{BracketRegistry, JurisdictionSchedule, RegistryError, ScheduleLookup};
