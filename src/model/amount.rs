//! Amount type for handling the monetary values found in contribution records.
//!
//! This module provides the `Amount` type which wraps `Decimal` so that sums of many small
//! contributions do not accumulate binary floating point error.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Number of decimal places used when an amount is rendered for a report.
const REPORT_PLACES: u32 = 2;

/// Represents a dollar amount.
///
/// Parsing accepts a plain decimal number such as `50`, `50.00` or `-25.5`, surrounded by optional
/// whitespace. Unlike spreadsheet exports, the FEC files never carry dollar signs or thousands
/// separators, so those are rejected rather than guessed at.
///
/// Display renders a `$` followed by the value rounded to two places:
/// ```
/// # use fec_tally::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("50").unwrap();
/// assert_eq!(amount.to_string(), "$50.00");
/// ```
///
/// Negative amounts (refunds) keep the sign after the dollar sign:
/// ```
/// # use fec_tally::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-5").unwrap();
/// assert_eq!(amount.to_string(), "$-5.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Adds `rhs`, returning `None` instead of panicking when the result does not fit in a
    /// `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.value.checked_add(rhs.value).map(Amount::new)
    }

    /// Adds `rhs`, clamping at the largest or smallest representable amount.
    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Amount::new(self.value.saturating_add(rhs.value))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    /// The string was empty or contained only whitespace.
    Empty,
    /// The string was not a decimal number.
    Invalid(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("Empty"),
            AmountError::Invalid(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("the amount is empty"),
            AmountError::Invalid(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AmountError::Empty => None,
            AmountError::Invalid(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        let value = Decimal::from_str(trimmed).map_err(AmountError::Invalid)?;
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut rounded = self.value.round_dp(REPORT_PLACES);
        rounded.rescale(REPORT_PLACES);
        write!(f, "${rounded}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize as the same string shown in reports
        serializer.serialize_str(&self.to_string())
    }
}
