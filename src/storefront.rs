//! Application context.
//!
//! One [`Storefront`] holds a single client's session state: the auth context
//! and the cart, both backed by the same durable store, plus shared handles to
//! the catalog and the order gateway. Callers receive it explicitly rather
//! than reaching for globals; [`SessionManager`](crate::session::SessionManager)
//! keeps one per client.

use std::sync::Arc;

use crate::auth::{AuthBackend, AuthContext, AuthUser};
use crate::cart_store::CartStore;
use crate::catalog::Catalog;
use crate::checkout::{self, CheckoutRequest, OrderGateway};
use crate::domain::aggregates::Order;
use crate::domain::value_objects::ProductId;
use crate::navigation::{self, NavItem};
use crate::storage::SharedStore;
use crate::{Result, StorefrontError};

pub struct Storefront {
    catalog: Arc<Catalog>,
    auth: AuthContext<SharedStore>,
    cart: CartStore<SharedStore>,
    orders: Arc<dyn OrderGateway>,
}

impl Storefront {
    pub fn new(catalog: Arc<Catalog>, storage: SharedStore, auth: Arc<dyn AuthBackend>, orders: Arc<dyn OrderGateway>) -> Self {
        Self {
            catalog,
            auth: AuthContext::load(auth, storage.clone()),
            cart: CartStore::load(storage),
            orders,
        }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn auth(&self) -> &AuthContext<SharedStore> { &self.auth }
    pub fn auth_mut(&mut self) -> &mut AuthContext<SharedStore> { &mut self.auth }
    pub fn cart(&self) -> &CartStore<SharedStore> { &self.cart }
    pub fn cart_mut(&mut self) -> &mut CartStore<SharedStore> { &mut self.cart }
    pub fn user(&self) -> Option<&AuthUser> { self.auth.user() }

    /// Looks the product up and adds it for the signed-in user.
    pub fn add_to_cart(&mut self, product_id: ProductId, quantity: u32, on_unauthenticated: impl FnOnce()) -> Result<bool> {
        let product = self.catalog.get(product_id).ok_or(StorefrontError::ProductNotFound(product_id))?;
        Ok(self.cart.add_item(self.auth.user(), product, quantity, on_unauthenticated))
    }

    pub async fn place_order(&mut self, request: CheckoutRequest) -> Result<Order> {
        let order = checkout::place_order(self.auth.user(), &mut self.cart, self.orders.as_ref(), request).await?;
        Ok(order)
    }

    pub fn navigation(&self) -> Vec<NavItem> { navigation::menu_for(self.user().map(|u| u.role)) }
}
