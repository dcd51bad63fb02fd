use freshharvest::{
    grid::ProductGrid,
    popularity::PopularityMap,
    pricing::format_price,
    products::ProductId,
    quantity::Quantity,
    storefront::{ProductOrder, PurchaseConfirmation},
};
use leptos::{prelude::*, task};
use tracing::{info, warn};

use crate::{DemoStorefront, SharedStorefront};

fn step_quantity(grid: RwSignal<ProductGrid>, id: &ProductId, delta: i32) {
    grid.update(|grid| {
        if let Err(error) = grid.change_quantity(id, delta) {
            warn!(%error, "quantity button pressed on a missing card");
        }
    });
}

/// Apply text typed into a card's selector. Returns whether it was accepted.
fn type_quantity(grid: RwSignal<ProductGrid>, id: &ProductId, input: &str) -> bool {
    match Quantity::parse(input) {
        Ok(quantity) => {
            grid.update(|grid| {
                if let Err(error) = grid.set_quantity(id, quantity) {
                    warn!(%error, "quantity typed into a missing card");
                }
            });
            true
        }
        Err(error) => {
            warn!(%error, product = %id, "rejected quantity input");
            // re-render the selector with the kept value
            grid.update(|_| {});
            false
        }
    }
}

fn complete_purchase(
    grid: RwSignal<ProductGrid>,
    confirmation: RwSignal<Option<PurchaseConfirmation>>,
    purchase: PurchaseConfirmation,
) {
    grid.update(|grid| {
        if let Err(error) = grid.reset_quantity(&purchase.product_id) {
            warn!(%error, "purchased product left the grid");
        }
    });
    confirmation.set(Some(purchase));
}

fn apply_order(grid: RwSignal<ProductGrid>, popularity: Option<PopularityMap>) -> ProductOrder {
    match popularity {
        Some(popularity) => {
            grid.update(|grid| grid.apply_popularity(&popularity));
            ProductOrder::Popularity
        }
        None => ProductOrder::Default,
    }
}

/// Fetch popularity into `grid` and log the order it ends up in.
async fn reload_products(
    storefront: &DemoStorefront,
    grid: RwSignal<ProductGrid>,
    trigger: &'static str,
) -> ProductOrder {
    let order = apply_order(grid, storefront.popularity().await);

    info!(?order, trigger, "product grid ordered");

    order
}

/// Page load: record the view, then sort the grid by popularity.
pub fn open_page(storefront: SharedStorefront, grid: RwSignal<ProductGrid>) {
    let storefront = storefront.get_value();

    task::spawn_local(async move {
        storefront.track_page_view().await;
        reload_products(&storefront, grid, "page load").await;
    });
}

fn buy(
    storefront: SharedStorefront,
    grid: RwSignal<ProductGrid>,
    confirmation: RwSignal<Option<PurchaseConfirmation>>,
    id: &ProductId,
) {
    let Some(card) = grid.with_untracked(|grid| grid.card(id).ok().cloned()) else {
        warn!(product = %id, "buy pressed on a missing card");
        return;
    };

    let storefront = storefront.get_value();

    task::spawn_local(async move {
        match storefront.buy(&card.product, card.quantity).await {
            Ok(purchase) => {
                complete_purchase(grid, confirmation, purchase);
                reload_products(&storefront, grid, "purchase").await;
            }
            Err(error) => warn!(%error, product = %card.product.id, "purchase failed"),
        }
    });
}

#[component]
fn ProductCard(
    id: ProductId,
    grid: RwSignal<ProductGrid>,
    storefront: SharedStorefront,
    confirmation: RwSignal<Option<PurchaseConfirmation>>,
) -> impl IntoView {
    let product = grid.with_untracked(|grid| grid.card(&id).ok().map(|card| card.product.clone()));

    let Some(product) = product else {
        return ().into_any();
    };

    let name = product.name.clone();
    let price = format_price(&product.price_per_kg);
    let decrease_label = format!("Decrease {name} quantity");
    let increase_label = format!("Increase {name} quantity");
    let buy_label = format!("Buy {name}");

    let quantity_id = id.clone();
    let decrease_id = id.clone();
    let increase_id = id.clone();
    let input_id = id.clone();
    let buy_id = id.clone();

    let quantity = move || {
        grid.with(|grid| grid.quantity(&quantity_id).map_or(Quantity::MIN, Quantity::get))
    };

    view! {
        <article class="product-card" data-product-id=id.to_string()>
            <h3 class="product-name">{name}</h3>
            <p class="product-price">{price}" / kg"</p>
            <div class="quantity-selector">
                <button
                    type="button"
                    class="quantity-decrease"
                    aria-label=decrease_label
                    on:click=move |_| step_quantity(grid, &decrease_id, -1)
                >
                    "-"
                </button>
                <input
                    type="number"
                    class="quantity-input"
                    min=Quantity::MIN.to_string()
                    max=Quantity::MAX.to_string()
                    prop:value=move || quantity().to_string()
                    on:change=move |event| {
                        type_quantity(grid, &input_id, &event_target_value(&event));
                    }
                />
                <button
                    type="button"
                    class="quantity-increase"
                    aria-label=increase_label
                    on:click=move |_| step_quantity(grid, &increase_id, 1)
                >
                    "+"
                </button>
            </div>
            <button
                type="button"
                class="buy-button"
                aria-label=buy_label
                on:click=move |_| buy(storefront, grid, confirmation, &buy_id)
            >
                "Buy now"
            </button>
        </article>
    }
    .into_any()
}

/// Product cards in display order.
#[component]
pub fn ProductsGrid(
    /// Page state shared with the modal.
    grid: RwSignal<ProductGrid>,
    /// Storefront used for purchases and popularity reloads.
    storefront: SharedStorefront,
    /// Set after each purchase to open the modal.
    confirmation: RwSignal<Option<PurchaseConfirmation>>,
) -> impl IntoView {
    view! {
        <section class="products-grid mx-auto grid max-w-5xl grid-cols-1 gap-6 md:grid-cols-3">
            <For
                each=move || grid.with(|grid| grid.product_ids().cloned().collect::<Vec<_>>())
                key=ProductId::clone
                children=move |id| {
                    view! {
                        <ProductCard
                            id=id
                            grid=grid
                            storefront=storefront
                            confirmation=confirmation
                        />
                    }
                }
            />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use std::{
        pin::pin,
        task::{Context, Poll, Waker},
    };

    use freshharvest::{
        pricing::total_price,
        products::{Catalog, CatalogError},
        storefront::Storefront,
        tracking::ProductPopularity,
    };
    use testresult::TestResult;

    use super::*;
    use crate::storage::LocalStorageUserIdStore;

    fn grid() -> Result<RwSignal<ProductGrid>, CatalogError> {
        Catalog::bundled().map(|catalog| RwSignal::new(ProductGrid::new(&catalog)))
    }

    fn ids(grid: RwSignal<ProductGrid>) -> Vec<String> {
        grid.with_untracked(|grid| grid.product_ids().map(ToString::to_string).collect())
    }

    #[test]
    fn step_quantity_stays_within_bounds() -> TestResult {
        let grid = grid()?;
        let tomato = ProductId::from("tomato");

        step_quantity(grid, &tomato, -1);
        assert_eq!(grid.with_untracked(|grid| grid.quantity(&tomato))?.get(), 1);

        for _ in 0..60 {
            step_quantity(grid, &tomato, 1);
        }
        assert_eq!(grid.with_untracked(|grid| grid.quantity(&tomato))?.get(), 50);

        Ok(())
    }

    #[test]
    fn typed_quantity_is_applied_when_valid() -> TestResult {
        let grid = grid()?;
        let onion = ProductId::from("onion");

        assert!(type_quantity(grid, &onion, "12"));
        assert_eq!(grid.with_untracked(|grid| grid.quantity(&onion))?.get(), 12);

        Ok(())
    }

    #[test]
    fn typed_quantity_out_of_range_keeps_previous_value() -> TestResult {
        let grid = grid()?;
        let onion = ProductId::from("onion");

        assert!(type_quantity(grid, &onion, "4"));
        assert!(!type_quantity(grid, &onion, "51"));
        assert!(!type_quantity(grid, &onion, "abc"));
        assert_eq!(grid.with_untracked(|grid| grid.quantity(&onion))?.get(), 4);

        Ok(())
    }

    #[test]
    fn complete_purchase_resets_card_and_opens_modal() -> TestResult {
        let grid = grid()?;
        let confirmation = RwSignal::new(None::<PurchaseConfirmation>);
        let carrot = ProductId::from("carrot");

        step_quantity(grid, &carrot, 2);

        let card = grid.with_untracked(|grid| grid.card(&carrot).cloned())?;
        let purchase = PurchaseConfirmation {
            product_id: carrot.clone(),
            product_name: card.product.name.clone(),
            quantity: card.quantity,
            total_price: total_price(&card.product.price_per_kg, card.quantity)?,
            tracked: true,
        };

        complete_purchase(grid, confirmation, purchase.clone());

        assert_eq!(grid.with_untracked(|grid| grid.quantity(&carrot))?.get(), 1);
        assert_eq!(confirmation.get_untracked(), Some(purchase));

        Ok(())
    }

    #[test]
    fn apply_order_sorts_by_popularity() -> TestResult {
        let grid = grid()?;
        let products = [ProductPopularity {
            product_id: ProductId::from("capsicum"),
            total_quantity: 7,
        }];

        let order = apply_order(grid, Some(PopularityMap::from_products(&products)));

        assert_eq!(order, ProductOrder::Popularity);
        assert_eq!(
            ids(grid),
            ["capsicum", "tomato", "onion", "potato", "carrot", "spinach"]
        );

        Ok(())
    }

    #[test]
    fn apply_order_without_popularity_keeps_default_order() -> TestResult {
        let grid = grid()?;

        let order = apply_order(grid, None);

        assert_eq!(order, ProductOrder::Default);
        assert_eq!(
            ids(grid),
            ["tomato", "onion", "potato", "carrot", "spinach", "capsicum"]
        );

        Ok(())
    }

    #[test]
    fn reload_without_endpoint_reports_default_order() -> TestResult {
        let grid = grid()?;
        let storefront = Storefront::new(None, LocalStorageUserIdStore);

        let mut reload = pin!(reload_products(&storefront, grid, "purchase"));
        let poll = reload.as_mut().poll(&mut Context::from_waker(Waker::noop()));

        assert_eq!(poll, Poll::Ready(ProductOrder::Default));
        assert_eq!(
            ids(grid),
            ["tomato", "onion", "potato", "carrot", "spinach", "capsicum"]
        );

        Ok(())
    }
}
