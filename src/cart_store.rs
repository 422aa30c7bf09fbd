//! Persisted cart.
//!
//! Wraps the [`Cart`] aggregate and mirrors the full line list to durable
//! storage after every mutation. Start-up hydration never fails: a missing or
//! malformed document yields an empty cart.

use crate::auth::AuthUser;
use crate::domain::aggregates::{Cart, CartLine, Product};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Price, ProductId};
use crate::storage::{load_json, save_json, KeyValueStore, CART_KEY};

pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn load(storage: S) -> Self {
        let lines = load_json::<Vec<CartLine>>(&storage, CART_KEY).unwrap_or_default();
        tracing::debug!(lines = lines.len(), "cart hydrated");
        Self { cart: Cart::from_lines(lines), storage }
    }

    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn lines(&self) -> &[CartLine] { self.cart.lines() }

    /// Adds to the cart on behalf of `user`. Without a signed-in user the
    /// cart is left untouched and `on_unauthenticated` runs instead.
    /// Returns whether the item was added.
    pub fn add_item(&mut self, user: Option<&AuthUser>, product: &Product, quantity: u32, on_unauthenticated: impl FnOnce()) -> bool {
        if user.is_none() {
            tracing::debug!(product_id = %product.id, "add to cart requires sign-in");
            on_unauthenticated();
            return false;
        }
        match self.cart.add_item(product, quantity) {
            Ok(_) => {
                self.commit();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "add to cart rejected");
                false
            }
        }
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        if self.cart.remove_item(product_id) { self.commit(); }
    }

    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if self.cart.update_quantity(product_id, quantity) { self.commit(); }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.commit();
    }

    pub fn get_cart_total(&self) -> Price { self.cart.total() }
    pub fn get_cart_item_count(&self) -> u32 { self.cart.item_count() }

    fn commit(&mut self) {
        for event in self.cart.take_events() {
            let DomainEvent::Cart(event) = event else { continue };
            tracing::debug!(?event, "cart changed");
        }
        // A failed write keeps the in-memory change; the next mutation retries.
        if let Err(e) = save_json(&self.storage, CART_KEY, self.cart.lines()) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::catalog::Catalog;
    use crate::storage::MemoryStore;
    use std::cell::Cell;

    fn shopper() -> AuthUser {
        AuthUser {
            id: "3".into(),
            email: "customer@example.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            role: Role::Customer,
            phone: None,
            business_name: None,
        }
    }

    fn product(id: u32) -> Product {
        Catalog::seeded().get(ProductId::new(id)).cloned().unwrap()
    }

    #[test]
    fn test_cart_scenario() {
        let user = shopper();
        let a = product(1);
        let mut store = CartStore::load(MemoryStore::new());
        assert!(store.add_item(Some(&user), &a, 2, || {}));
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.lines()[0].quantity, 2);
        assert_eq!(store.get_cart_total(), a.price.multiply(2));
        assert!(store.add_item(Some(&user), &a, 1, || {}));
        assert_eq!(store.lines()[0].quantity, 3);
        store.update_quantity(a.id, 1);
        assert_eq!(store.lines()[0].quantity, 1);
        assert_eq!(store.get_cart_total(), a.price);
        store.clear_cart();
        assert!(store.cart().is_empty());
        assert_eq!(store.get_cart_total(), Price::ZERO);
    }

    #[test]
    fn test_unauthenticated_add_invokes_callback() {
        let storage = MemoryStore::new();
        let mut store = CartStore::load(storage.clone());
        let called = Cell::new(false);
        assert!(!store.add_item(None, &product(1), 1, || called.set(true)));
        assert!(called.get());
        assert!(store.cart().is_empty());
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_out_of_stock_add_fails() {
        let mut store = CartStore::load(MemoryStore::new());
        assert!(!store.add_item(Some(&shopper()), &product(3), 1, || {}));
        assert_eq!(store.get_cart_item_count(), 0);
    }

    #[test]
    fn test_reload_reproduces_lines() {
        let storage = MemoryStore::new();
        let user = shopper();
        let mut store = CartStore::load(storage.clone());
        store.add_item(Some(&user), &product(4), 2, || {});
        store.add_item(Some(&user), &product(7), 1, || {});
        store.add_item(Some(&user), &product(1), 3, || {});
        store.remove_item(ProductId::new(7));

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.lines(), store.lines());
        assert_eq!(reloaded.get_cart_item_count(), 5);
        assert!(reloaded.cart().line(ProductId::new(7)).is_none());
    }

    #[test]
    fn test_corrupt_storage_yields_empty_cart() {
        let storage = MemoryStore::new();
        storage.set(CART_KEY, "[{\"product\": 12").unwrap();
        let store = CartStore::load(storage.clone());
        assert!(store.cart().is_empty());

        storage.set(CART_KEY, "{\"unexpected\": true}").unwrap();
        assert!(CartStore::load(storage).cart().is_empty());
    }

    #[test]
    fn test_stale_document_clamped_on_load() {
        let storage = MemoryStore::new();
        let stale = vec![CartLine { product: product(8), quantity: 9 }, CartLine { product: product(3), quantity: 1 }];
        save_json(&storage, CART_KEY, &stale).unwrap();
        let store = CartStore::load(storage);
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.get_cart_item_count(), 3);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let storage = MemoryStore::new();
        let mut store = CartStore::load(storage.clone());
        store.remove_item(ProductId::new(42));
        store.update_quantity(ProductId::new(42), 3);
        assert!(store.cart().is_empty());
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_backed_cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CartStore::load(crate::storage::FileStore::new(dir.path()));
        store.add_item(Some(&shopper()), &product(2), 2, || {});
        let reloaded = CartStore::load(crate::storage::FileStore::new(dir.path()));
        assert_eq!(reloaded.get_cart_item_count(), 2);
        assert_eq!(reloaded.get_cart_total(), product(2).price.multiply(2));
    }
}
