//! Domain events
use crate::domain::aggregates::OrderStatus;
use crate::domain::value_objects::{Price, ProductId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { product_id: ProductId, quantity: u32 },
    QuantityUpdated { product_id: ProductId, quantity: u32 },
    ItemRemoved { product_id: ProductId },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Placed { order_number: String, total: Price },
    StatusChanged { order_number: String, status: OrderStatus },
    Cancelled { order_number: String },
}
