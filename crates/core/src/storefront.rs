//! Storefront page flow.
//!
//! Every network call here is best effort: failures are logged and the page
//! carries on with what it has.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    client::{TrackingClient, TrackingError},
    grid::{GridError, ProductGrid},
    popularity::PopularityMap,
    pricing::{PricingError, format_price, total_price},
    products::{Product, ProductId},
    quantity::Quantity,
    tracking::{PageViewEvent, PurchaseEvent},
    user::{UserId, UserIdStore, resolve_user_id},
};

/// Storefront errors
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The grid has no such product.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What the shopper sees after pressing buy.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseConfirmation {
    /// Purchased product
    pub product_id: ProductId,

    /// Product display name
    pub product_name: String,

    /// Kilograms purchased
    pub quantity: Quantity,

    /// Amount charged
    pub total_price: Money<'static, Currency>,

    /// Whether the endpoint accepted the purchase event
    pub tracked: bool,
}

impl PurchaseConfirmation {
    /// Confirmation text shown in the modal.
    pub fn message(&self) -> String {
        format!(
            "{quantity} kg of {name} purchased successfully! Total: {total}. \
             Your fresh {lower} will be delivered to your home within 24 hours!",
            quantity = self.quantity,
            name = self.product_name,
            total = format_price(&self.total_price),
            lower = self.product_name.to_lowercase(),
        )
    }
}

/// Order the grid ended up in after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrder {
    /// Sorted by reported popularity.
    Popularity,

    /// Left in its pre-rendered order.
    Default,
}

/// Drives purchases, product ordering and page view tracking.
#[derive(Debug)]
pub struct Storefront<C, S> {
    client: C,
    user_ids: S,
}

impl<C: TrackingClient, S: UserIdStore> Storefront<C, S> {
    /// Create a storefront over a tracking client and visitor id store.
    pub fn new(client: C, user_ids: S) -> Self {
        Self { client, user_ids }
    }

    /// Tracking client in use.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Visitor id, created on first use.
    pub fn user_id(&self) -> UserId {
        resolve_user_id(&self.user_ids)
    }

    /// Buy `quantity` kilograms of `product`.
    ///
    /// The purchase is confirmed whether or not tracking succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if the total cannot be computed.
    pub async fn buy(
        &self,
        product: &Product,
        quantity: Quantity,
    ) -> Result<PurchaseConfirmation, StorefrontError> {
        let total = total_price(&product.price_per_kg, quantity)?;

        let event = PurchaseEvent {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            total_price: *total.amount(),
            user_id: self.user_id(),
            timestamp: Timestamp::now(),
        };

        info!(product = %product.id, %quantity, total = %format_price(&total), "tracking purchase");

        let tracked = match self.client.track_purchase(event).await {
            Ok(()) => true,
            Err(error) => {
                log_tracking_failure("purchase", &error);
                false
            }
        };

        Ok(PurchaseConfirmation {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            total_price: total,
            tracked,
        })
    }

    /// Buy whatever quantity the card for `id` shows, then reset the card
    /// and reload the product order.
    ///
    /// Returns the confirmation together with the order the grid was left in.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has no card for `id` or the total cannot
    /// be computed.
    pub async fn buy_from_grid(
        &self,
        grid: &mut ProductGrid,
        id: &ProductId,
    ) -> Result<(PurchaseConfirmation, ProductOrder), StorefrontError> {
        let card = grid.card(id)?;
        let product = card.product.clone();
        let quantity = card.quantity;

        let confirmation = self.buy(&product, quantity).await?;

        grid.reset_quantity(id)?;
        let order = self.load_products(grid).await;

        Ok((confirmation, order))
    }

    /// Fetch popularity totals.
    ///
    /// Returns `None` when the call fails, the endpoint is not configured, or
    /// nothing was reported, meaning the default order should stand.
    pub async fn popularity(&self) -> Option<PopularityMap> {
        match self.client.fetch_popularity().await {
            Ok(response) if response.products.is_empty() => {
                info!("no popularity reported, using default product order");
                None
            }
            Ok(response) => Some(PopularityMap::from_products(&response.products)),
            Err(TrackingError::NotConfigured) => {
                info!("using default product order, tracking endpoint not configured");
                None
            }
            Err(error) => {
                warn!(%error, "failed to load products, using default product order");
                None
            }
        }
    }

    /// Reorder `grid` by popularity, leaving it untouched on any failure.
    pub async fn load_products(&self, grid: &mut ProductGrid) -> ProductOrder {
        match self.popularity().await {
            Some(popularity) => {
                grid.apply_popularity(&popularity);
                info!(reported = popularity.len(), "products sorted by popularity");
                ProductOrder::Popularity
            }
            None => ProductOrder::Default,
        }
    }

    /// Record a page view. Returns whether the endpoint accepted it.
    pub async fn track_page_view(&self) -> bool {
        let event = PageViewEvent {
            user_id: self.user_id(),
            timestamp: Timestamp::now(),
        };

        match self.client.track_page_view(event).await {
            Ok(()) => true,
            Err(error) => {
                log_tracking_failure("page view", &error);
                false
            }
        }
    }

    /// Page load: record the view, then sort the grid.
    pub async fn open_page(&self, grid: &mut ProductGrid) -> ProductOrder {
        self.track_page_view().await;
        self.load_products(grid).await
    }
}

fn log_tracking_failure(what: &str, error: &TrackingError) {
    if matches!(error, TrackingError::NotConfigured) {
        info!("skipping {what} tracking, endpoint not configured");
    } else {
        warn!(%error, "failed to track {what}");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use testresult::TestResult;

    use super::*;
    use crate::{
        products::Catalog,
        tracking::{ProductPopularity, ProductsResponse},
        user::MemoryUserIdStore,
    };

    #[derive(Debug, Default)]
    struct RecordingClient {
        fail: bool,
        popularity: Vec<ProductPopularity>,
        purchases: RefCell<Vec<PurchaseEvent>>,
        page_views: RefCell<Vec<PageViewEvent>>,
    }

    impl RecordingClient {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn reporting(entries: &[(&str, u64)]) -> Self {
            Self {
                popularity: entries
                    .iter()
                    .map(|(id, total)| ProductPopularity {
                        product_id: ProductId::from(*id),
                        total_quantity: *total,
                    })
                    .collect(),
                ..Self::default()
            }
        }

        fn outcome(&self) -> Result<(), TrackingError> {
            if self.fail {
                Err(TrackingError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl TrackingClient for RecordingClient {
        async fn track_purchase(&self, event: PurchaseEvent) -> Result<(), TrackingError> {
            self.purchases.borrow_mut().push(event);
            self.outcome()
        }

        async fn track_page_view(&self, event: PageViewEvent) -> Result<(), TrackingError> {
            self.page_views.borrow_mut().push(event);
            self.outcome()
        }

        async fn fetch_popularity(&self) -> Result<ProductsResponse, TrackingError> {
            self.outcome()?;

            Ok(ProductsResponse {
                products: self.popularity.clone(),
            })
        }
    }

    fn storefront<C: TrackingClient>(client: C) -> Storefront<C, MemoryUserIdStore> {
        Storefront::new(
            client,
            MemoryUserIdStore::with_user_id(UserId::from_stored("user_1_visitor00")),
        )
    }

    fn ids(grid: &ProductGrid) -> Vec<&str> {
        grid.product_ids().map(ProductId::as_str).collect()
    }

    #[tokio::test]
    async fn buy_tracks_purchase_with_total() -> TestResult {
        let catalog = Catalog::bundled()?;
        let storefront = storefront(RecordingClient::default());
        let tomato = catalog
            .get(&ProductId::from("tomato"))
            .ok_or("missing tomato")?;

        let confirmation = storefront.buy(tomato, Quantity::new(3)?).await?;

        assert!(confirmation.tracked);
        assert_eq!(confirmation.total_price.to_minor_units(), 12_000);

        let purchases = storefront.client().purchases.borrow();
        let event = purchases.first().ok_or("no purchase recorded")?;

        assert_eq!(event.product_id.as_str(), "tomato");
        assert_eq!(event.product_name, "Tomatoes");
        assert_eq!(event.quantity.get(), 3);
        assert_eq!(event.total_price.to_string(), "120.00");
        assert_eq!(event.user_id.as_str(), "user_1_visitor00");

        Ok(())
    }

    #[tokio::test]
    async fn buy_confirms_even_when_tracking_fails() -> TestResult {
        let catalog = Catalog::bundled()?;
        let storefront = storefront(RecordingClient::failing());
        let onion = catalog
            .get(&ProductId::from("onion"))
            .ok_or("missing onion")?;

        let confirmation = storefront.buy(onion, Quantity::new(2)?).await?;

        assert!(!confirmation.tracked);
        assert_eq!(confirmation.total_price.to_minor_units(), 7000);

        Ok(())
    }

    #[tokio::test]
    async fn buy_confirms_without_endpoint() -> TestResult {
        let catalog = Catalog::bundled()?;
        let storefront = storefront(None::<RecordingClient>);
        let potato = catalog
            .get(&ProductId::from("potato"))
            .ok_or("missing potato")?;

        let confirmation = storefront.buy(potato, Quantity::default()).await?;

        assert!(!confirmation.tracked);
        assert_eq!(
            confirmation.message(),
            "1 kg of Potatoes purchased successfully! Total: ₹30.00. \
             Your fresh potatoes will be delivered to your home within 24 hours!"
        );

        Ok(())
    }

    #[tokio::test]
    async fn buy_from_grid_resets_quantity_and_resorts() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut grid = ProductGrid::new(&catalog);
        let carrot = ProductId::from("carrot");
        let storefront = storefront(RecordingClient::reporting(&[("carrot", 5), ("onion", 2)]));

        grid.change_quantity(&carrot, 4)?;

        let (confirmation, order) = storefront.buy_from_grid(&mut grid, &carrot).await?;

        assert_eq!(order, ProductOrder::Popularity);
        assert_eq!(confirmation.quantity.get(), 5);
        assert_eq!(confirmation.total_price.to_minor_units(), 25_000);
        assert_eq!(grid.quantity(&carrot)?.get(), 1);
        assert_eq!(
            ids(&grid),
            ["carrot", "onion", "tomato", "potato", "spinach", "capsicum"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn buy_from_grid_rejects_unknown_product() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut grid = ProductGrid::new(&catalog);
        let storefront = storefront(RecordingClient::default());

        let result = storefront
            .buy_from_grid(&mut grid, &ProductId::from("mango"))
            .await;

        assert!(matches!(
            result,
            Err(StorefrontError::Grid(GridError::UnknownProduct(_)))
        ));
        assert!(storefront.client().purchases.borrow().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn load_products_keeps_default_order_on_failure() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut grid = ProductGrid::new(&catalog);
        let before = grid.clone();

        let order = storefront(RecordingClient::failing())
            .load_products(&mut grid)
            .await;

        assert_eq!(order, ProductOrder::Default);
        assert_eq!(grid, before);

        Ok(())
    }

    #[tokio::test]
    async fn load_products_keeps_default_order_when_nothing_reported() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut grid = ProductGrid::new(&catalog);

        let order = storefront(RecordingClient::default())
            .load_products(&mut grid)
            .await;

        assert_eq!(order, ProductOrder::Default);
        assert_eq!(
            ids(&grid),
            ["tomato", "onion", "potato", "carrot", "spinach", "capsicum"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn load_products_keeps_default_order_without_endpoint() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut grid = ProductGrid::new(&catalog);

        let order = storefront(None::<RecordingClient>)
            .load_products(&mut grid)
            .await;

        assert_eq!(order, ProductOrder::Default);

        Ok(())
    }

    #[tokio::test]
    async fn open_page_tracks_view_then_sorts() -> TestResult {
        let catalog = Catalog::bundled()?;
        let mut grid = ProductGrid::new(&catalog);
        let storefront = storefront(RecordingClient::reporting(&[
            ("capsicum", 3),
            ("potato", 3),
            ("spinach", 8),
        ]));

        let order = storefront.open_page(&mut grid).await;

        assert_eq!(order, ProductOrder::Popularity);
        assert_eq!(storefront.client().page_views.borrow().len(), 1);
        assert_eq!(
            ids(&grid),
            ["spinach", "potato", "capsicum", "tomato", "onion", "carrot"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn track_page_view_reports_failure_without_erroring() {
        let storefront = storefront(RecordingClient::failing());

        assert!(!storefront.track_page_view().await);
        assert_eq!(storefront.client().page_views.borrow().len(), 1);
    }
}
