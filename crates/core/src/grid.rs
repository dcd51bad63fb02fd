//! Product grid

use thiserror::Error;

use crate::{
    popularity::PopularityMap,
    products::{Catalog, Product, ProductId},
    quantity::Quantity,
};

/// Grid errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// No card on the grid carries this id.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// One product card with its quantity selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    /// Product shown on the card
    pub product: Product,

    /// Currently selected kilograms
    pub quantity: Quantity,
}

/// The storefront's product cards in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGrid {
    cards: Vec<ProductCard>,
}

impl ProductGrid {
    /// Lay the catalog out in its default order, every selector at 1 kg.
    pub fn new(catalog: &Catalog) -> Self {
        let cards = catalog
            .products()
            .iter()
            .cloned()
            .map(|product| ProductCard {
                product,
                quantity: Quantity::default(),
            })
            .collect();

        Self { cards }
    }

    /// Cards in display order.
    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    /// Card ids in display order.
    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.cards.iter().map(|card| &card.product.id)
    }

    /// Look a card up by product id.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownProduct`] if no card matches.
    pub fn card(&self, id: &ProductId) -> Result<&ProductCard, GridError> {
        self.cards
            .iter()
            .find(|card| &card.product.id == id)
            .ok_or_else(|| GridError::UnknownProduct(id.clone()))
    }

    fn card_mut(&mut self, id: &ProductId) -> Result<&mut ProductCard, GridError> {
        self.cards
            .iter_mut()
            .find(|card| &card.product.id == id)
            .ok_or_else(|| GridError::UnknownProduct(id.clone()))
    }

    /// Selected quantity for a product.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownProduct`] if no card matches.
    pub fn quantity(&self, id: &ProductId) -> Result<Quantity, GridError> {
        self.card(id).map(|card| card.quantity)
    }

    /// Press a `-`/`+` button; out-of-range steps are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownProduct`] if no card matches.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i32) -> Result<Quantity, GridError> {
        let card = self.card_mut(id)?;

        card.quantity.change(delta);

        Ok(card.quantity)
    }

    /// Type a quantity straight into a card's selector.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownProduct`] if no card matches.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: Quantity) -> Result<(), GridError> {
        self.card_mut(id)?.quantity = quantity;

        Ok(())
    }

    /// Put a card's selector back to 1 kg.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownProduct`] if no card matches.
    pub fn reset_quantity(&mut self, id: &ProductId) -> Result<(), GridError> {
        self.card_mut(id)?.quantity.reset();

        Ok(())
    }

    /// Reorder the cards most popular first.
    pub fn apply_popularity(&mut self, popularity: &PopularityMap) {
        popularity.sort_by_popularity(&mut self.cards, |card| &card.product.id);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::tracking::ProductPopularity;

    fn grid() -> Result<ProductGrid, crate::products::CatalogError> {
        Catalog::bundled().map(|catalog| ProductGrid::new(&catalog))
    }

    #[test]
    fn new_grid_starts_at_one_kilogram_in_catalog_order() -> TestResult {
        let grid = grid()?;

        assert!(grid.cards().iter().all(|card| card.quantity.get() == 1));
        assert_eq!(
            grid.product_ids().map(ProductId::as_str).collect::<Vec<_>>(),
            ["tomato", "onion", "potato", "carrot", "spinach", "capsicum"]
        );

        Ok(())
    }

    #[test]
    fn change_quantity_updates_only_that_card() -> TestResult {
        let mut grid = grid()?;
        let onion = ProductId::from("onion");

        grid.change_quantity(&onion, 1)?;
        grid.change_quantity(&onion, 1)?;

        assert_eq!(grid.quantity(&onion)?.get(), 3);
        assert_eq!(grid.quantity(&ProductId::from("tomato"))?.get(), 1);

        Ok(())
    }

    #[test]
    fn change_quantity_ignores_step_below_one() -> TestResult {
        let mut grid = grid()?;
        let tomato = ProductId::from("tomato");

        let quantity = grid.change_quantity(&tomato, -1)?;

        assert_eq!(quantity.get(), 1);

        Ok(())
    }

    #[test]
    fn unknown_product_is_an_error() -> TestResult {
        let mut grid = grid()?;
        let mango = ProductId::from("mango");

        assert_eq!(
            grid.change_quantity(&mango, 1),
            Err(GridError::UnknownProduct(mango.clone()))
        );
        assert!(grid.reset_quantity(&mango).is_err());

        Ok(())
    }

    #[test]
    fn set_quantity_overwrites_selector() -> TestResult {
        let mut grid = grid()?;
        let potato = ProductId::from("potato");

        grid.set_quantity(&potato, Quantity::new(42)?)?;

        assert_eq!(grid.quantity(&potato)?.get(), 42);

        Ok(())
    }

    #[test]
    fn reset_quantity_returns_to_one() -> TestResult {
        let mut grid = grid()?;
        let carrot = ProductId::from("carrot");

        grid.change_quantity(&carrot, 4)?;
        grid.reset_quantity(&carrot)?;

        assert_eq!(grid.quantity(&carrot)?.get(), 1);

        Ok(())
    }

    #[test]
    fn apply_popularity_moves_cards_with_their_quantities() -> TestResult {
        let mut grid = grid()?;
        let spinach = ProductId::from("spinach");

        grid.change_quantity(&spinach, 2)?;

        let products = [
            ProductPopularity {
                product_id: spinach.clone(),
                total_quantity: 9,
            },
            ProductPopularity {
                product_id: ProductId::from("potato"),
                total_quantity: 4,
            },
        ];

        grid.apply_popularity(&PopularityMap::from_products(&products));

        assert_eq!(
            grid.product_ids().map(ProductId::as_str).collect::<Vec<_>>(),
            ["spinach", "potato", "tomato", "onion", "carrot", "capsicum"]
        );
        assert_eq!(grid.quantity(&spinach)?.get(), 3);

        Ok(())
    }
}
