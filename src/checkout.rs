//! Mock checkout.
//!
//! Turns the signed-in user's cart into an [`Order`] through an
//! [`OrderGateway`]. The bundled [`MockOrderGateway`] only waits and numbers
//! the order; nothing leaves the process.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::auth::AuthUser;
use crate::cart_store::CartStore;
use crate::domain::aggregates::{LineItem, Order, OrderError, OrderSummary, PaymentMethod};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Please sign in to place an order")]
    Unauthenticated,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Order service unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub coupon: Option<String>,
}

/// Everything the order service needs to accept an order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: String,
    pub items: Vec<LineItem>,
    pub summary: OrderSummary,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit(&self, draft: OrderDraft) -> Result<Order, CheckoutError>;
}

/// Numbers orders `ORD-YYYYMMDD-NNN` from an in-process counter.
pub struct MockOrderGateway {
    sequence: AtomicU32,
    delay: Duration,
}

impl MockOrderGateway {
    pub fn new(delay: Duration) -> Self { Self { sequence: AtomicU32::new(0), delay } }
    pub fn shared(delay: Duration) -> Arc<dyn OrderGateway> { Arc::new(Self::new(delay)) }
}

#[async_trait]
impl OrderGateway for MockOrderGateway {
    async fn submit(&self, draft: OrderDraft) -> Result<Order, CheckoutError> {
        if !self.delay.is_zero() { tokio::time::sleep(self.delay).await; }
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let number = format!("ORD-{}-{seq:03}", Utc::now().format("%Y%m%d"));
        Ok(Order::place(number, draft.customer_id, draft.items, draft.summary, draft.payment_method, draft.notes)?)
    }
}

/// Places an order for everything in the cart and empties it on success.
/// The cart is left intact when the gateway rejects the order.
pub async fn place_order<S: KeyValueStore>(user: Option<&AuthUser>, cart: &mut CartStore<S>, gateway: &dyn OrderGateway, request: CheckoutRequest) -> Result<Order, CheckoutError> {
    let user = user.ok_or(CheckoutError::Unauthenticated)?;
    if cart.cart().is_empty() { return Err(CheckoutError::EmptyCart); }
    let draft = OrderDraft {
        customer_id: user.id.clone(),
        items: cart.lines().iter().map(LineItem::from).collect(),
        summary: OrderSummary::for_checkout(cart.cart(), request.coupon.as_deref()),
        payment_method: request.payment_method,
        notes: request.notes,
    };
    let mut order = gateway.submit(draft).await?;
    for event in order.take_events() {
        tracing::debug!(?event, "order event");
    }
    tracing::info!(order_number = order.order_number(), total = %order.total(), customer_id = %user.id, "order placed");
    cart.clear_cart();
    Ok(order)
}
