//! Tax estimation calculations.
//!
//! The single calculator here turns a resolved estimate request into a
//! structured estimate by walking a jurisdiction's marginal-rate bands.

pub mod common;
pub mod estimator;

pub use estimator::{EstimatorError, TaxEstimator};
