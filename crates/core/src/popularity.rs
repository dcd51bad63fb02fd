//! Popularity ordering

use rustc_hash::FxHashMap;

use crate::{products::ProductId, tracking::ProductPopularity};

/// Kilograms sold per product, as reported by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityMap {
    totals: FxHashMap<ProductId, u64>,
}

impl PopularityMap {
    /// Build the map from the endpoint's product list.
    ///
    /// A product reported more than once keeps its last total.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a ProductPopularity>) -> Self {
        let totals = products
            .into_iter()
            .map(|product| (product.product_id.clone(), product.total_quantity))
            .collect();

        Self { totals }
    }

    /// Popularity of `id`; unreported products score zero.
    pub fn score(&self, id: &ProductId) -> u64 {
        self.totals.get(id).copied().unwrap_or_default()
    }

    /// Whether the endpoint reported no products at all.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Number of reported products.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Reorder `items` most popular first.
    ///
    /// The sort is stable so equally popular items keep their relative order.
    pub fn sort_by_popularity<T>(&self, items: &mut [T], id_of: impl Fn(&T) -> &ProductId) {
        items.sort_by(|left, right| self.score(id_of(right)).cmp(&self.score(id_of(left))));
    }
}
