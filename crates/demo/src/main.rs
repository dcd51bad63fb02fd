//! FreshHarvest storefront page

use std::rc::Rc;

use freshharvest::{
    client::{HttpTrackingClient, TrackingEndpoint},
    grid::ProductGrid,
    products::Catalog,
    storefront::{PurchaseConfirmation, Storefront},
};
use leptos::prelude::*;
use tracing::warn;

mod modal;
mod products;
mod storage;

/// Tracking endpoint baked in at build time; unset disables tracking.
const API_ENDPOINT: Option<&str> = option_env!("FRESHHARVEST_API_ENDPOINT");

type DemoStorefront = Storefront<Option<HttpTrackingClient>, storage::LocalStorageUserIdStore>;

/// Storefront handle that can be captured by reactive closures.
type SharedStorefront = StoredValue<Rc<DemoStorefront>, LocalStorage>;

fn tracking_client(endpoint: Option<&str>) -> Option<HttpTrackingClient> {
    let endpoint = endpoint.map(str::trim).filter(|value| !value.is_empty())?;

    match endpoint.parse::<TrackingEndpoint>() {
        Ok(endpoint) => Some(HttpTrackingClient::new(endpoint)),
        Err(error) => {
            warn!(%error, "ignoring tracking endpoint, tracking disabled");
            None
        }
    }
}

/// Main storefront shell.
#[component]
fn App() -> impl IntoView {
    match Catalog::bundled() {
        Ok(catalog) => {
            let grid = RwSignal::new(ProductGrid::new(&catalog));
            let confirmation = RwSignal::new(None::<PurchaseConfirmation>);
            let storefront = StoredValue::new_local(Rc::new(Storefront::new(
                tracking_client(API_ENDPOINT),
                storage::LocalStorageUserIdStore,
            )));

            products::open_page(storefront, grid);

            view! {
                <main class="min-h-screen bg-emerald-50 px-4 py-6 text-slate-900">
                    <div class="mx-auto mb-6 max-w-5xl">
                        <h1 class="text-2xl font-semibold tracking-tight">"FreshHarvest"</h1>
                        <p class="text-sm text-slate-600">
                            "Farm fresh vegetables, delivered to your home within 24 hours."
                        </p>
                    </div>
                    <products::ProductsGrid
                        grid=grid
                        storefront=storefront
                        confirmation=confirmation
                    />
                    <modal::ConfirmationModal confirmation=confirmation />
                </main>
            }
            .into_any()
        }
        Err(error) => {
            let message = format!("Failed to load products: {error}");

            view! {
                <main class="min-h-screen bg-emerald-50 px-4 py-6 text-slate-900">
                    <div class="mx-auto mb-6 max-w-5xl">
                        <h1 class="text-2xl font-semibold tracking-tight">"FreshHarvest"</h1>
                    </div>
                    <div class="mx-auto max-w-3xl rounded-lg border border-red-200 bg-red-50 p-4">
                        <p class="text-sm text-red-700">{message}</p>
                    </div>
                </main>
            }
            .into_any()
        }
    }
}

fn main() {
    console_error_panic_hook::set_once();

    leptos::mount::mount_to_body(App);
}
