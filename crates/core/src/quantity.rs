//! Quantity Selector

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Quantity errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a number.
    #[error("quantity is not a number: {0:?}")]
    NotANumber(String),

    /// The number is outside the allowed range.
    #[error("quantity {0} is outside {min}..={max}", min = Quantity::MIN, max = Quantity::MAX)]
    OutOfRange(i64),
}

/// Kilograms selected for a product, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest selectable quantity.
    pub const MIN: u32 = 1;

    /// Largest selectable quantity.
    pub const MAX: u32 = 50;

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::OutOfRange`] when `value` is outside `MIN..=MAX`.
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuantityError::OutOfRange(i64::from(value)))
        }
    }

    /// Parse the selector's text value.
    ///
    /// Leading whitespace and a sign are accepted and parsing stops at the
    /// first non-digit, so `"3kg"` reads as 3.
    ///
    /// # Errors
    ///
    /// Returns an error when no digits lead the input or the value is out of range.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let trimmed = input.trim_start();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(QuantityError::NotANumber(input.to_string()));
        }

        let magnitude = digits
            .parse::<i64>()
            .map_err(|_err| QuantityError::NotANumber(input.to_string()))?;
        let value = if negative { -magnitude } else { magnitude };

        u32::try_from(value)
            .map_err(|_err| QuantityError::OutOfRange(value))
            .and_then(Self::new)
    }

    /// Apply a step from the `-`/`+` buttons.
    ///
    /// The step is ignored when it would leave the allowed range. Returns
    /// whether the quantity changed.
    pub fn change(&mut self, delta: i32) -> bool {
        let next = i64::from(self.0) + i64::from(delta);

        match u32::try_from(next) {
            Ok(next) if next != self.0 && (Self::MIN..=Self::MAX).contains(&next) => {
                self.0 = next;
                true
            }
            _ => false,
        }
    }

    /// Back to the minimum after a purchase.
    pub fn reset(&mut self) {
        self.0 = Self::MIN;
    }

    /// Kilograms as a number.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
