//! Terminal rendering of the product grid and purchase confirmations.

use std::io;

use freshharvest::{
    grid::ProductGrid,
    pricing::format_price,
    storefront::{ProductOrder, PurchaseConfirmation},
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

/// Write the grid as a table in display order.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_grid(
    out: &mut impl io::Write,
    grid: &ProductGrid,
    order: ProductOrder,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Id", "Product", "Price / kg", "Qty (kg)"]);

    for (idx, card) in grid.cards().iter().enumerate() {
        builder.push_record([
            format!("{}", idx + 1),
            card.product.id.to_string(),
            card.product.name.clone(),
            format_price(&card.product.price_per_kg),
            card.quantity.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    let caption = match order {
        ProductOrder::Popularity => "sorted by popularity",
        ProductOrder::Default => "default order",
    };

    writeln!(out, "{table}")?;
    writeln!(out, "({caption})")
}

/// Write the confirmation shown after a purchase.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_confirmation(
    out: &mut impl io::Write,
    confirmation: &PurchaseConfirmation,
) -> io::Result<()> {
    writeln!(out, "{}", confirmation.message())?;

    if !confirmation.tracked {
        writeln!(out, "(purchase was not recorded by the tracking endpoint)")?;
    }

    Ok(())
}
