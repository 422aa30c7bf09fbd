//! Product catalog
pub mod query;
pub mod seed;

pub use query::{CatalogView, FilterConfig, Page, PriceRange, SortKey, UnknownSortKey};
pub use seed::{Category, ColorSwatch, PriceBand, CATEGORIES, COLORS, PRICE_BANDS};

use crate::domain::aggregates::Product;
use crate::domain::value_objects::ProductId;

/// Immutable product list, loaded once at start-up.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self { Self { products } }
    pub fn seeded() -> Self { Self::new(seed::products()) }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }
    pub fn get(&self, id: ProductId) -> Option<&Product> { self.products.iter().find(|p| p.id == id) }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Other products from the same category, in catalog order.
    pub fn related(&self, id: ProductId, limit: usize) -> Vec<&Product> {
        let Some(product) = self.get(id) else { return Vec::new() };
        self.by_category(&product.category).filter(|p| p.id != id).take(limit).collect()
    }

    pub fn query(&self, filter: &FilterConfig, sort: SortKey, page: usize, per_page: usize) -> Page<&Product> {
        query::query(&self.products, filter, sort, page, per_page)
    }
}
