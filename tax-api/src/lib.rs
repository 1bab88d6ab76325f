pub mod calendar;
pub mod request;
pub mod response;
pub mod service;
pub mod validation;

pub use calendar::{CalendarEntry, CalendarEntryKind, calendar_response, payment_schedule};
pub use request::{CallerProfile, EstimateRequestBody};
pub use response::{ErrorResponse, EstimateResponse, TaxCalculation};
pub use service::{EstimateServiceError, estimate_for_caller};
pub use validation::{FieldError, MAX_TAX_YEAR, MIN_TAX_YEAR, ValidationFailure};
