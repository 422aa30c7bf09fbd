//! Filter, sort and paginate the catalog.
//!
//! The pipeline is pure: `filter_products` → `sort_products` → `paginate`.
//! Predicates of different kinds combine with AND; values selected within one
//! kind (several categories, several colors) combine with OR.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::Product;
use crate::domain::value_objects::Price;

/// Upper bound of the catalog's price slider.
pub const DEFAULT_MAX_PRICE: Price = Price::new(50_000);

/// Inclusive price bounds; `max: None` is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Option<Price>,
}

impl PriceRange {
    pub const fn new(min: Price, max: Option<Price>) -> Self { Self { min, max } }
    pub fn contains(&self, price: Price) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

impl Default for PriceRange {
    fn default() -> Self { Self::new(Price::ZERO, Some(DEFAULT_MAX_PRICE)) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub search: String,
    pub categories: Vec<String>,
    pub colors: Vec<String>,
    pub price: PriceRange,
}

impl FilterConfig {
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        self.matches_with(product, &needle)
    }

    fn matches_with(&self, product: &Product, needle: &str) -> bool {
        product.matches_text(needle)
            && (self.categories.is_empty() || self.categories.iter().any(|c| c == &product.category))
            && (self.colors.is_empty() || {
                let color = product.color.to_lowercase();
                self.colors.iter().any(|c| color.contains(&c.to_lowercase()))
            })
            && self.price.contains(product.price)
    }

    /// Number of active filter chips: each category and color, plus one for a
    /// narrowed price range. Search text is not counted.
    pub fn active_count(&self) -> usize {
        self.categories.len() + self.colors.len() + usize::from(self.price != PriceRange::default())
    }

    pub fn is_empty(&self) -> bool { self.search.trim().is_empty() && self.active_count() == 0 }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    Newest,
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [Self::Featured, Self::PriceLow, Self::PriceHigh, Self::Rating, Self::Newest, Self::Name];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|k| k.as_str() == s).ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

pub fn filter_products<'a>(products: &'a [Product], filter: &FilterConfig) -> Vec<&'a Product> {
    let needle = filter.search.trim().to_lowercase();
    products.iter().filter(|p| filter.matches_with(p, &needle)).collect()
}

/// Stable sort; ties keep their incoming order.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    match key {
        SortKey::PriceLow => products.sort_by_key(|p| p.price),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => products.sort_by_key(|p| !p.is_new),
        SortKey::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
        SortKey::Featured => products.sort_by_key(|p| !p.in_stock),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn has_next(&self) -> bool { self.page < self.total_pages }
    pub fn has_previous(&self) -> bool { self.page > 1 }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), page: self.page, per_page: self.per_page, total_items: self.total_items, total_pages: self.total_pages }
    }
}

/// Slices out 1-based page `page`. Out-of-range pages clamp to the nearest
/// valid one; an empty input yields page 1 of 0.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let items = items.into_iter().skip((page - 1) * per_page).take(per_page).collect();
    Page { items, page, per_page, total_items, total_pages }
}

/// Runs the whole pipeline.
pub fn query<'a>(products: &'a [Product], filter: &FilterConfig, sort: SortKey, page: usize, per_page: usize) -> Page<&'a Product> {
    let mut matched = filter_products(products, filter);
    sort_products(&mut matched, sort);
    paginate(matched, page, per_page)
}

/// Browsing state for one catalog view. Any change to the filters or the sort
/// key sends the view back to page 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogView {
    filter: FilterConfig,
    sort: SortKey,
    page: usize,
    per_page: usize,
}

impl CatalogView {
    pub fn new(per_page: usize) -> Self {
        Self { filter: FilterConfig::default(), sort: SortKey::default(), page: 1, per_page: per_page.max(1) }
    }

    pub fn filter(&self) -> &FilterConfig { &self.filter }
    pub fn sort(&self) -> SortKey { self.sort }
    pub fn page(&self) -> usize { self.page }
    pub fn per_page(&self) -> usize { self.per_page }

    pub fn set_search(&mut self, text: impl Into<String>) { self.filter.search = text.into(); self.page = 1; }

    pub fn toggle_category(&mut self, id: &str) { toggle(&mut self.filter.categories, id); self.page = 1; }

    pub fn toggle_color(&mut self, id: &str) { toggle(&mut self.filter.colors, id); self.page = 1; }

    pub fn set_price_range(&mut self, range: PriceRange) { self.filter.price = range; self.page = 1; }

    pub fn set_sort(&mut self, sort: SortKey) { self.sort = sort; self.page = 1; }

    pub fn clear_filters(&mut self) { self.filter = FilterConfig::default(); self.page = 1; }

    pub fn set_page(&mut self, page: usize) { self.page = page.max(1); }

    /// Renders the current page, clamping the stored page number to what
    /// exists under the current filters.
    pub fn view<'a>(&mut self, products: &'a [Product]) -> Page<&'a Product> {
        let page = query(products, &self.filter, self.sort, self.page, self.per_page);
        self.page = page.page;
        page
    }
}

fn toggle(selected: &mut Vec<String>, id: &str) {
    match selected.iter().position(|s| s == id) {
        Some(i) => { selected.remove(i); }
        None => selected.push(id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn catalog() -> Vec<Product> { seed::products() }

    fn ids(page: &[&Product]) -> Vec<u32> { page.iter().map(|p| p.id.value()).collect() }

    #[test]
    fn test_silk_price_low_first_page() {
        let products = catalog();
        let filter = FilterConfig { categories: vec!["silk".into()], ..Default::default() };
        let page = query(&products, &filter, SortKey::PriceLow, 1, 4);
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.total_items, 6);
        assert_eq!(page.total_pages, 2);
        let prices: Vec<i64> = page.items.iter().map(|p| p.price.amount()).collect();
        assert_eq!(prices, vec![7499, 9999, 12999, 15999]);
        assert!(page.items.iter().all(|p| p.category == "silk"));
    }

    #[test]
    fn test_every_result_satisfies_filter() {
        let products = catalog();
        let filter = FilterConfig {
            search: "SILK".into(),
            categories: vec!["silk".into(), "designer".into()],
            colors: vec!["green".into(), "Gold".into(), "white".into()],
            price: PriceRange::new(Price::new(5_000), Some(Price::new(25_000))),
        };
        let matched = filter_products(&products, &filter);
        assert!(!matched.is_empty());
        for p in &products {
            let included = matched.iter().any(|m| m.id == p.id);
            assert_eq!(included, filter.matches(p), "{}", p.name);
        }
        assert_eq!(ids(&matched), vec![1, 3, 8]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let products = catalog();
        let filter = FilterConfig { colors: vec!["blue".into()], ..Default::default() };
        assert_eq!(filter_products(&products, &filter), filter_products(&products, &filter));
    }

    #[test]
    fn test_search_matches_tags() {
        let products = catalog();
        let filter = FilterConfig { search: "eco-friendly".into(), ..Default::default() };
        assert_eq!(ids(&filter_products(&products, &filter)), vec![7]);
    }

    #[test]
    fn test_price_sorts_are_monotonic() {
        let products = catalog();
        let mut all: Vec<&Product> = products.iter().collect();
        sort_products(&mut all, SortKey::PriceLow);
        assert!(all.windows(2).all(|w| w[0].price <= w[1].price));
        sort_products(&mut all, SortKey::PriceHigh);
        assert!(all.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_featured_and_newest_are_stable() {
        let products = catalog();
        let mut all: Vec<&Product> = products.iter().collect();
        sort_products(&mut all, SortKey::Featured);
        assert_eq!(all.last().map(|p| p.id.value()), Some(3));
        assert_eq!(all[0].id.value(), 1);
        assert_eq!(all[1].id.value(), 2);

        let mut all: Vec<&Product> = products.iter().collect();
        sort_products(&mut all, SortKey::Newest);
        let new_ids: Vec<u32> = all.iter().take_while(|p| p.is_new).map(|p| p.id.value()).collect();
        assert_eq!(new_ids, vec![1, 3, 6, 8, 10, 13, 16]);
    }

    #[test]
    fn test_rating_and_name_sorts() {
        let products = catalog();
        let mut all: Vec<&Product> = products.iter().collect();
        sort_products(&mut all, SortKey::Rating);
        assert!(all.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert_eq!(ids(&all[..3]), vec![2, 8, 9]);
        sort_products(&mut all, SortKey::Name);
        assert_eq!(all[0].name, "Black Sequin Georgette");
    }

    #[test]
    fn test_pages_concatenate_to_full_result() {
        let products = catalog();
        let filter = FilterConfig::default();
        let full = query(&products, &filter, SortKey::Name, 1, usize::MAX).items;
        for per_page in [1, 3, 4, 5, 16, 20] {
            let first = query(&products, &filter, SortKey::Name, 1, per_page);
            let joined: Vec<&Product> = (1..=first.total_pages)
                .flat_map(|n| query(&products, &filter, SortKey::Name, n, per_page).items)
                .collect();
            assert_eq!(ids(&joined), ids(&full), "per_page {per_page}");
        }
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let page = paginate((1..=10).collect::<Vec<u32>>(), 99, 4);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, vec![9, 10]);
        assert!(!page.has_next());
        assert_eq!(paginate((1..=10).collect::<Vec<u32>>(), 0, 4).items, vec![1, 2, 3, 4]);

        let empty = paginate(Vec::<u32>::new(), 5, 12);
        assert_eq!((empty.page, empty.total_pages), (1, 0));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let products = catalog();
        let filter = FilterConfig { search: "velvet".into(), ..Default::default() };
        let page = query(&products, &filter, SortKey::Featured, 1, 12);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_view_resets_page_on_change() {
        let products = catalog();
        let mut view = CatalogView::new(4);
        view.set_page(3);
        assert_eq!(view.view(&products).page, 3);
        view.toggle_category("silk");
        assert_eq!(view.page(), 1);
        view.set_page(9);
        assert_eq!(view.view(&products).page, 2);
        view.set_sort(SortKey::Rating);
        assert_eq!(view.page(), 1);
        view.toggle_color("red");
        view.set_price_range(PriceRange::new(Price::new(1000), Some(Price::new(20000))));
        assert_eq!(view.filter().active_count(), 3);
        view.toggle_category("silk");
        assert_eq!(view.filter().active_count(), 2);
        view.clear_filters();
        assert!(view.filter().is_empty());
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("price-high".parse::<SortKey>(), Ok(SortKey::PriceHigh));
        assert!("cheapest".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }
}
