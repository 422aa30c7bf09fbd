//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, ProductError, Specifications};
pub use order::{LineItem, Order, OrderError, OrderStatus, OrderSummary, PaymentMethod, PaymentStatus, TimelineEntry};
pub use cart::{Cart, CartError, CartLine};
