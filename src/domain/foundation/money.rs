//! Monetary amounts in minor currency units.
//!
//! Prices and payments are kept as integer paise (1/100 rupee) so that the
//! amount sent to the payment provider and the amount it echoes back in a
//! webhook compare exactly. Never use floats for stored amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Non-negative amount of money in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Minor units per major unit.
    pub const MINOR_PER_MAJOR: i64 = 100;

    /// Zero amount, used for admin grants.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Creates an amount from minor units as reported by the payment provider.
    pub fn from_minor(minor: i64) -> Result<Self, ValidationError> {
        if minor < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, minor));
        }
        Ok(Self(minor))
    }

    /// Creates an amount from whole major units (a course price of 2999 rupees).
    pub fn from_major(major: i64) -> Result<Self, ValidationError> {
        let minor = major
            .checked_mul(Self::MINOR_PER_MAJOR)
            .ok_or_else(|| ValidationError::invalid_format("amount", "amount overflows"))?;
        Self::from_minor(minor)
    }

    /// Amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Amount in major units as a float, for display only.
    pub fn major_units(&self) -> f64 {
        self.0 as f64 / Self::MINOR_PER_MAJOR as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Money {
    /// Formats as major units, dropping the fraction when it is zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / Self::MINOR_PER_MAJOR;
        let minor = self.0 % Self::MINOR_PER_MAJOR;
        if minor == 0 {
            write!(f, "{}", major)
        } else {
            write!(f, "{}.{:02}", major, minor)
        }
    }
}
