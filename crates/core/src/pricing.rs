//! Pricing

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::quantity::Quantity;

/// Pricing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The total does not fit in minor units.
    #[error("total price overflows for {quantity} kg at {unit_minor} minor units per kg")]
    Overflow {
        /// Price per kilogram in minor units
        unit_minor: i64,

        /// Kilograms purchased
        quantity: u32,
    },
}

/// Total for `quantity` kilograms at `price_per_kg`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product exceeds `i64` minor units.
pub fn total_price(
    price_per_kg: &Money<'static, Currency>,
    quantity: Quantity,
) -> Result<Money<'static, Currency>, PricingError> {
    let unit_minor = price_per_kg.to_minor_units();

    let total_minor = unit_minor
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow {
            unit_minor,
            quantity: quantity.get(),
        })?;

    Ok(Money::from_minor(total_minor, price_per_kg.currency()))
}

/// Format an amount with its currency symbol.
pub fn format_price(money: &Money<'_, Currency>) -> String {
    let minor_units = money.to_minor_units();
    let currency_code = money.currency().iso_alpha_code;

    let abs_minor = minor_units.unsigned_abs();
    let major_units = abs_minor / 100;
    let fractional = abs_minor % 100;
    let sign = if minor_units < 0 { "-" } else { "" };
    let symbol = match currency_code {
        "INR" => "₹",
        "GBP" => "£",
        "USD" => "$",
        "EUR" => "€",
        _ => "",
    };

    if symbol.is_empty() {
        format!("{sign}{major_units}.{fractional:02} {currency_code}")
    } else {
        format!("{sign}{symbol}{major_units}.{fractional:02}")
    }
}
