//! Products

use std::{fmt, fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashSet;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_CATALOG_YAML: &str = include_str!("../fixtures/products/freshharvest.yml");

/// Product identifier, as carried on grid cards and in tracking payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Price for one kilogram
    pub price_per_kg: Money<'static, Currency>,
}

/// Catalog Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The same product id appears twice
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// No products in the catalog
    #[error("No products found in catalog")]
    Empty,
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,

    /// Price per kilogram (e.g., "40 INR")
    price: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product {
            id: ProductId(fixture.id),
            name: fixture.name,
            price_per_kg: Money::from_minor(minor_units, currency),
        })
    }
}

/// The products on sale, in their default display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    currency: &'static Currency,
}

impl Catalog {
    /// The catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(BUNDLED_CATALOG_YAML)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when parsing fails, a price is invalid, currencies are
    /// inconsistent, ids repeat, or no products are present.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut products = Vec::with_capacity(fixture.products.len());
        let mut seen = FxHashSet::default();
        let mut currency: Option<&'static Currency> = None;

        for product_fixture in fixture.products {
            if !seen.insert(product_fixture.id.clone()) {
                return Err(CatalogError::DuplicateProduct(product_fixture.id));
            }

            let product = Product::try_from(product_fixture)?;
            let product_currency = product.price_per_kg.currency();

            if let Some(existing) = currency
                && existing != product_currency
            {
                return Err(CatalogError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }

            currency = Some(product_currency);
            products.push(product);
        }

        Ok(Self {
            currency: currency.ok_or(CatalogError::Empty)?,
            products,
        })
    }

    /// Look a product up by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Products in default order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Currency shared by every product.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Parse price string (e.g., "40 INR" or "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "INR" => INR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
