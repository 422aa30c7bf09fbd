//! Cart Aggregate

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Price, ProductId};

/// Ordered cart lines, at most one per product.
///
/// Quantities are kept within `[1, product.stock_quantity]`: adds and updates
/// clamp to available stock, and a line never survives at quantity zero.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId { self.product.id }
    pub fn line_total(&self) -> Price { self.product.price.multiply(self.quantity) }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rebuilds a cart from persisted lines. Duplicates merge, quantities clamp
    /// to the recorded stock, and empty or out-of-stock lines are dropped.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines.into_iter().filter(|l| l.quantity > 0 && l.product.is_available()) {
            let stock = line.product.stock_quantity;
            match cart.lines.iter_mut().find(|l| l.product_id() == line.product_id()) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity).min(stock),
                None => cart.lines.push(CartLine { quantity: line.quantity.min(stock), ..line }),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    /// Returns the line's resulting quantity.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if !product.is_available() { return Err(CartError::OutOfStock(product.id)); }
        let stock = product.stock_quantity;
        let quantity = quantity.max(1);
        let (previous, resulting) = match self.lines.iter_mut().find(|l| l.product_id() == product.id) {
            Some(existing) => {
                let previous = existing.quantity;
                existing.quantity = previous.saturating_add(quantity).min(stock);
                (previous, existing.quantity)
            }
            None => {
                let line = CartLine { product: product.clone(), quantity: quantity.min(stock) };
                let q = line.quantity;
                self.lines.push(line);
                (0, q)
            }
        };
        let added = resulting.saturating_sub(previous);
        if added > 0 {
            self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { product_id: product.id, quantity: added }));
        }
        Ok(resulting)
    }

    /// Sets a line's quantity; zero removes the line. Returns false when the
    /// product is not in the cart.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        let Some(stock) = self.line(product_id).map(|l| l.product.stock_quantity) else { return false; };
        let clamped = quantity.min(stock);
        if clamped == 0 { return self.remove_item(product_id); }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id() == product_id) {
            line.quantity = clamped;
        }
        self.raise_event(DomainEvent::Cart(CartEvent::QuantityUpdated { product_id, quantity: clamped }));
        true
    }

    /// Removes a line. Returns false when nothing was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id() != product_id);
        if self.lines.len() == before { return false; }
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { product_id }));
        true
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared));
    }

    pub fn total(&self) -> Price { self.lines.iter().map(CartLine::line_total).sum() }
    pub fn item_count(&self) -> u32 { self.lines.iter().map(|l| l.quantity).sum() }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),
}
