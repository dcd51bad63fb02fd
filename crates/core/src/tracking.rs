//! Tracking payloads exchanged with the storefront endpoint.

use jiff::Timestamp;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{products::ProductId, quantity::Quantity, user::UserId};

/// Event posted to the endpoint, tagged by its `action`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum TrackingEvent {
    /// A completed purchase.
    #[serde(rename = "trackPurchase")]
    Purchase(PurchaseEvent),

    /// A storefront page load.
    #[serde(rename = "trackPageView")]
    PageView(PageViewEvent),
}

/// Purchase record sent after the buy button is pressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEvent {
    /// Purchased product
    pub product_id: ProductId,

    /// Product display name
    pub product_name: String,

    /// Kilograms purchased
    pub quantity: Quantity,

    /// Total in major units, e.g. `120` for ₹120.00.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,

    /// Visitor that made the purchase
    pub user_id: UserId,

    /// When the purchase was made
    pub timestamp: Timestamp,
}

/// Page view record sent on page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewEvent {
    /// Visitor that loaded the page
    pub user_id: UserId,

    /// When the page was loaded
    pub timestamp: Timestamp,
}

/// Body returned by `?action=getProducts`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductsResponse {
    /// Per-product totals, in no particular order
    #[serde(default)]
    pub products: Vec<ProductPopularity>,
}

/// Purchase totals for one product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPopularity {
    /// Product the totals belong to; numeric ids are read as their digits.
    #[serde(deserialize_with = "lenient_product_id")]
    pub product_id: ProductId,

    /// Kilograms sold so far. Fractional totals are rounded; anything absent,
    /// negative or non-numeric counts as zero.
    #[serde(default, deserialize_with = "lenient_total")]
    pub total_quantity: u64,
}

fn lenient_product_id<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => ProductId::new(id),
        other => ProductId::new(other.to_string()),
    })
}

fn lenient_total<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => total_from_number(&number),
        _ => 0,
    })
}

fn total_from_number(number: &Number) -> u64 {
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .and_then(Decimal::from_f64)
                .and_then(|total| total.round().to_u64())
        })
        .unwrap_or_default()
}
