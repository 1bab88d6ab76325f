//! Bracket table provider.
//!
//! A [`BracketRegistry`] holds one [`JurisdictionSchedule`] per supported
//! jurisdiction code and resolves lookups for the tax calculator. The tables
//! are immutable reference data: registered once at startup (or taken from
//! [`BracketRegistry::builtin`]) and only read afterwards.
//!
//! Lookup is an exact match on the jurisdiction code. An unknown code is not
//! an error: it falls back to the default jurisdiction's schedule, and the
//! lookup result says so via [`ScheduleLookup::used_fallback`]. A misspelled
//! code is therefore indistinguishable from an intentional default; callers
//! that care should check the flag.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{SurtaxRule, TaxBracket};

mod builtin;

pub use builtin::DEFAULT_JURISDICTION;

/// Errors raised by bracket table integrity checks and lookups.
///
/// Every variant is a configuration problem, not a user-input problem;
/// callers should treat these as fatal rather than report them per field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A registered jurisdiction has no brackets at all.
    #[error("jurisdiction '{0}' has no tax brackets")]
    EmptyBrackets(String),

    /// The first band of a schedule does not start at zero.
    #[error("jurisdiction '{jurisdiction}' brackets must start at zero, got {lower_bound}")]
    FirstBracketNotZero {
        jurisdiction: String,
        lower_bound: Decimal,
    },

    /// A band's lower bound does not meet the previous band's upper bound.
    #[error(
        "jurisdiction '{jurisdiction}' brackets are not contiguous: \
         expected lower bound {expected}, got {found}"
    )]
    NonContiguousBrackets {
        jurisdiction: String,
        expected: Decimal,
        found: Decimal,
    },

    /// A band other than the last has no upper bound.
    #[error("jurisdiction '{jurisdiction}' has an unbounded bracket before the top band")]
    UnboundedBracketNotLast { jurisdiction: String },

    /// The last band has an upper bound; the top band must be unbounded.
    #[error("jurisdiction '{0}' top bracket must be unbounded")]
    BoundedTopBracket(String),

    /// A band's upper bound is not strictly greater than its lower bound.
    #[error(
        "jurisdiction '{jurisdiction}' has an empty bracket: \
         lower bound {lower_bound}, upper bound {upper_bound}"
    )]
    InvalidBracketBounds {
        jurisdiction: String,
        lower_bound: Decimal,
        upper_bound: Decimal,
    },

    /// A bracket rate is outside the 0–100 percentage range.
    #[error("jurisdiction '{jurisdiction}' has a bracket rate outside 0-100: {rate}")]
    InvalidRate {
        jurisdiction: String,
        rate: Decimal,
    },

    /// A surtax rate is outside the 0–100 percentage range.
    #[error("jurisdiction '{jurisdiction}' has a surtax rate outside 0-100: {rate}")]
    InvalidSurtaxRate {
        jurisdiction: String,
        rate: Decimal,
    },

    /// A surtax income ceiling is not positive.
    #[error("jurisdiction '{jurisdiction}' has a non-positive surtax ceiling: {income_ceiling}")]
    InvalidSurtaxCeiling {
        jurisdiction: String,
        income_ceiling: Decimal,
    },

    /// The configured default jurisdiction has no registered schedule,
    /// so fallback lookups have nowhere to land.
    #[error("default jurisdiction '{0}' is not registered")]
    UnknownDefaultJurisdiction(String),
}

/// The full rate schedule of one jurisdiction: its marginal-rate bands and,
/// where the jurisdiction defines one, a surtax rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSchedule {
    pub jurisdiction: String,
    pub brackets: Vec<TaxBracket>,
    pub surtax: Option<SurtaxRule>,
}

impl JurisdictionSchedule {
    /// Checks the table invariants: bands sorted and contiguous, first band
    /// starting at zero, exactly the last band unbounded, rates within
    /// 0–100, and a sane surtax rule if one is present.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let Some(first) = self.brackets.first() else {
            return Err(RegistryError::EmptyBrackets(self.jurisdiction.clone()));
        };

        if first.lower_bound != Decimal::ZERO {
            return Err(RegistryError::FirstBracketNotZero {
                jurisdiction: self.jurisdiction.clone(),
                lower_bound: first.lower_bound,
            });
        }

        let mut expected_lower = Decimal::ZERO;
        let last_index = self.brackets.len() - 1;
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE_HUNDRED {
                return Err(RegistryError::InvalidRate {
                    jurisdiction: self.jurisdiction.clone(),
                    rate: bracket.rate,
                });
            }
            if bracket.lower_bound != expected_lower {
                return Err(RegistryError::NonContiguousBrackets {
                    jurisdiction: self.jurisdiction.clone(),
                    expected: expected_lower,
                    found: bracket.lower_bound,
                });
            }
            match bracket.upper_bound {
                Some(upper) => {
                    if index == last_index {
                        return Err(RegistryError::BoundedTopBracket(
                            self.jurisdiction.clone(),
                        ));
                    }
                    if upper <= bracket.lower_bound {
                        return Err(RegistryError::InvalidBracketBounds {
                            jurisdiction: self.jurisdiction.clone(),
                            lower_bound: bracket.lower_bound,
                            upper_bound: upper,
                        });
                    }
                    expected_lower = upper;
                }
                None => {
                    if index != last_index {
                        return Err(RegistryError::UnboundedBracketNotLast {
                            jurisdiction: self.jurisdiction.clone(),
                        });
                    }
                }
            }
        }

        if let Some(surtax) = &self.surtax {
            if surtax.rate < Decimal::ZERO || surtax.rate > Decimal::ONE_HUNDRED {
                return Err(RegistryError::InvalidSurtaxRate {
                    jurisdiction: self.jurisdiction.clone(),
                    rate: surtax.rate,
                });
            }
            if surtax.income_ceiling <= Decimal::ZERO {
                return Err(RegistryError::InvalidSurtaxCeiling {
                    jurisdiction: self.jurisdiction.clone(),
                    income_ceiling: surtax.income_ceiling,
                });
            }
        }

        Ok(())
    }
}

/// Result of a registry lookup: the resolved schedule and whether the
/// default jurisdiction stood in for an unknown code.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleLookup<'a> {
    pub schedule: &'a JurisdictionSchedule,
    pub used_fallback: bool,
}

/// Registry of [`JurisdictionSchedule`]s keyed by jurisdiction code.
///
/// Typical lifetime:
/// 1. Create with [`BracketRegistry::new`] (or take [`BracketRegistry::builtin`]).
/// 2. Call [`register`](Self::register) once per supported jurisdiction.
/// 3. Hand a shared reference to any number of concurrent estimators.
#[derive(Debug, Clone)]
pub struct BracketRegistry {
    default_jurisdiction: String,
    schedules: HashMap<String, JurisdictionSchedule>,
}

impl BracketRegistry {
    /// Create an empty registry whose fallback target is
    /// `default_jurisdiction`.
    pub fn new(default_jurisdiction: impl Into<String>) -> Self {
        Self {
            default_jurisdiction: default_jurisdiction.into(),
            schedules: HashMap::new(),
        }
    }

    /// Register a jurisdiction's schedule.
    ///
    /// If a schedule for the same jurisdiction code is already present it is
    /// silently replaced.
    pub fn register(&mut self, schedule: JurisdictionSchedule) {
        self.schedules
            .insert(schedule.jurisdiction.clone(), schedule);
    }

    /// The jurisdiction code unknown lookups fall back to.
    pub fn default_jurisdiction(&self) -> &str {
        &self.default_jurisdiction
    }

    /// Codes of every registered jurisdiction, sorted alphabetically.
    pub fn registered_jurisdictions(&self) -> Vec<&str> {
        let mut codes: Vec<_> = self.schedules.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Checks every registered schedule and that the default jurisdiction is
    /// itself registered. Cheap; the calculator runs it per estimate.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for schedule in self.schedules.values() {
            schedule.validate()?;
        }
        if !self.schedules.contains_key(&self.default_jurisdiction) {
            return Err(RegistryError::UnknownDefaultJurisdiction(
                self.default_jurisdiction.clone(),
            ));
        }
        Ok(())
    }

    /// Resolve the schedule for `jurisdiction`, falling back to the default
    /// jurisdiction when the code is unknown.
    ///
    /// `tax_year` is accepted for forward compatibility; the registered
    /// tables do not vary by year yet.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownDefaultJurisdiction`] when the fallback
    /// target itself has no schedule.
    pub fn lookup(
        &self,
        jurisdiction: &str,
        tax_year: i32,
    ) -> Result<ScheduleLookup<'_>, RegistryError> {
        debug!(jurisdiction, tax_year, "resolving bracket schedule");

        if let Some(schedule) = self.schedules.get(jurisdiction) {
            return Ok(ScheduleLookup {
                schedule,
                used_fallback: false,
            });
        }

        let schedule = self
            .schedules
            .get(&self.default_jurisdiction)
            .ok_or_else(|| {
                RegistryError::UnknownDefaultJurisdiction(self.default_jurisdiction.clone())
            })?;

        Ok(ScheduleLookup {
            schedule,
            used_fallback: true,
        })
    }

    /// The ordered bracket sequence for `jurisdiction`, with the same
    /// fallback policy as [`lookup`](Self::lookup).
    pub fn brackets_for(
        &self,
        jurisdiction: &str,
        tax_year: i32,
    ) -> Result<&[TaxBracket], RegistryError> {
        Ok(&self.lookup(jurisdiction, tax_year)?.schedule.brackets)
    }
}
