use std::io;

use clap::Args;
use freshharvest::{grid::ProductGrid, products::ProductId, quantity::Quantity};
use freshharvest_app::{context::AppContext, render};

#[derive(Debug, Args)]
pub(crate) struct BuyArgs {
    /// Product id, as listed by `products`
    #[arg(long)]
    product: String,

    /// Kilograms to buy (1-50)
    #[arg(long, default_value = "1", value_parser = Quantity::parse)]
    quantity: Quantity,
}

pub(crate) async fn run(context: &AppContext, args: BuyArgs) -> Result<(), String> {
    let mut grid = ProductGrid::new(&context.catalog);
    let product = ProductId::new(args.product);

    grid.set_quantity(&product, args.quantity)
        .map_err(|error| error.to_string())?;

    let (confirmation, order) = context
        .storefront
        .buy_from_grid(&mut grid, &product)
        .await
        .map_err(|error| format!("failed to buy {product}: {error}"))?;

    let mut out = io::stdout().lock();

    render::write_confirmation(&mut out, &confirmation)
        .and_then(|()| render::write_grid(&mut out, &grid, order))
        .map_err(|error| format!("failed to write confirmation: {error}"))
}
