//! FreshHarvest
//!
//! Storefront logic for produce sold by the kilogram: the product catalog,
//! quantity selectors, purchase totals, popularity ordering and the tracking
//! endpoint client shared by the CLI and the browser page.

pub mod client;
pub mod grid;
pub mod popularity;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quantity;
pub mod storefront;
pub mod tracking;
pub mod user;
