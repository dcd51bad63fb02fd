use std::io;

use freshharvest::grid::ProductGrid;
use freshharvest_app::{context::AppContext, render};

pub(crate) async fn run(context: &AppContext) -> Result<(), String> {
    let mut grid = ProductGrid::new(&context.catalog);

    let order = context.storefront.open_page(&mut grid).await;

    render::write_grid(&mut io::stdout().lock(), &grid, order)
        .map_err(|error| format!("failed to write products: {error}"))
}
