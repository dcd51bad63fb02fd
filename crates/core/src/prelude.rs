//! FreshHarvest prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    client::{HttpTrackingClient, TrackingClient, TrackingEndpoint, TrackingError},
    grid::{GridError, ProductCard, ProductGrid},
    popularity::PopularityMap,
    pricing::{PricingError, format_price, total_price},
    products::{Catalog, CatalogError, Product, ProductId},
    quantity::{Quantity, QuantityError},
    storefront::{ProductOrder, PurchaseConfirmation, Storefront, StorefrontError},
    tracking::{PageViewEvent, ProductPopularity, ProductsResponse, PurchaseEvent, TrackingEvent},
    user::{MemoryUserIdStore, UserId, UserIdError, UserIdStore, resolve_user_id},
};
