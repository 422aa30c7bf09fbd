//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::{Cart, CartLine};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::{Price, ProductId};

/// Subtotals above this ship free on the cart page.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::new(20_000);
pub const STANDARD_SHIPPING: Price = Price::new(500);
/// Flat shipping charged at checkout.
pub const CHECKOUT_SHIPPING: Price = Price::new(50);
pub const GST_PERCENT: i64 = 18;
pub const COUPON_CODE: &str = "SILK200";
pub const COUPON_DISCOUNT: Price = Price::new(200);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub discount: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Summary shown on the cart page: free shipping over the threshold.
    pub fn for_cart(cart: &Cart) -> Self {
        let subtotal = cart.total();
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD || cart.is_empty() { Price::ZERO } else { STANDARD_SHIPPING };
        Self::compute(subtotal, shipping, Price::ZERO)
    }

    /// Summary charged at checkout: flat shipping, optional coupon.
    pub fn for_checkout(cart: &Cart, coupon: Option<&str>) -> Self {
        let discount = match coupon.map(str::trim) {
            Some(code) if code.eq_ignore_ascii_case(COUPON_CODE) => COUPON_DISCOUNT,
            _ => Price::ZERO,
        };
        Self::compute(cart.total(), CHECKOUT_SHIPPING, discount)
    }

    fn compute(subtotal: Price, shipping: Price, discount: Price) -> Self {
        let tax = subtotal.percent(GST_PERCENT);
        let total = (subtotal + shipping + tax).saturating_sub(discount);
        Self { subtotal, shipping, tax, discount, total }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem { pub product_id: ProductId, pub name: String, pub quantity: u32, pub unit_price: Price, pub total: Price }

impl From<&CartLine> for LineItem {
    fn from(line: &CartLine) -> Self {
        Self { product_id: line.product_id(), name: line.product.name.clone(), quantity: line.quantity, unit_price: line.product.price, total: line.line_total() }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus { #[default] Placed, Confirmed, Packed, Shipped, OutForDelivery, Delivered, Cancelled }

impl OrderStatus {
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            Self::Placed => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Packed),
            Self::Packed => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Placed => "Order Placed",
            Self::Confirmed => "Order Confirmed",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod { #[default] Card, Upi, Netbanking, Cod }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus { #[default] Pending, Paid, Refunded }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry { pub status: OrderStatus, pub at: DateTime<Utc> }

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    order_number: String,
    customer_id: String,
    status: OrderStatus,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    items: Vec<LineItem>,
    summary: OrderSummary,
    notes: Option<String>,
    timeline: Vec<TimelineEntry>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl Order {
    /// Places an order. Prepaid methods are settled immediately; cash on
    /// delivery stays pending until the order is delivered.
    pub fn place(order_number: impl Into<String>, customer_id: impl Into<String>, items: Vec<LineItem>, summary: OrderSummary, payment_method: PaymentMethod, notes: Option<String>) -> Result<Self, OrderError> {
        if items.is_empty() { return Err(OrderError::NoItems); }
        let now = Utc::now();
        let payment_status = if payment_method == PaymentMethod::Cod { PaymentStatus::Pending } else { PaymentStatus::Paid };
        let mut order = Self {
            order_number: order_number.into(), customer_id: customer_id.into(), status: OrderStatus::Placed,
            payment_method, payment_status, items, summary, notes: notes.filter(|n| !n.trim().is_empty()),
            timeline: vec![TimelineEntry { status: OrderStatus::Placed, at: now }], created_at: now, updated_at: now, events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Placed { order_number: order.order_number.clone(), total: summary.total }));
        Ok(order)
    }

    pub fn order_number(&self) -> &str { &self.order_number }
    pub fn customer_id(&self) -> &str { &self.customer_id }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn payment_status(&self) -> PaymentStatus { self.payment_status }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn summary(&self) -> &OrderSummary { &self.summary }
    pub fn total(&self) -> Price { self.summary.total }
    pub fn notes(&self) -> Option<&str> { self.notes.as_deref() }
    pub fn timeline(&self) -> &[TimelineEntry] { &self.timeline }

    /// Moves the order one step along the fulfilment timeline.
    pub fn advance(&mut self) -> Result<OrderStatus, OrderError> {
        let next = self.status.next().ok_or(OrderError::InvalidTransition(self.status))?;
        self.set_status(next);
        if next == OrderStatus::Delivered && self.payment_status == PaymentStatus::Pending {
            self.payment_status = PaymentStatus::Paid;
        }
        Ok(next)
    }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if self.status >= OrderStatus::Shipped { return Err(OrderError::CannotCancel(self.status)); }
        self.set_status(OrderStatus::Cancelled);
        if self.payment_status == PaymentStatus::Paid { self.payment_status = PaymentStatus::Refunded; }
        self.raise_event(DomainEvent::Order(OrderEvent::Cancelled { order_number: self.order_number.clone() }));
        Ok(())
    }

    fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.touch();
        self.timeline.push(TimelineEntry { status, at: self.updated_at });
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_number: self.order_number.clone(), status }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("order has no items")]
    NoItems,
    #[error("order cannot be cancelled once {}", .0.label())]
    CannotCancel(OrderStatus),
    #[error("no status follows {}", .0.label())]
    InvalidTransition(OrderStatus),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Product;

    fn cart_with(price: i64, quantity: u32) -> Cart {
        let product = Product {
            id: ProductId::new(1),
            name: "Widget Saree".into(),
            price: Price::new(price),
            in_stock: true,
            stock_quantity: 50,
            ..Default::default()
        };
        let mut cart = Cart::new();
        cart.add_item(&product, quantity).unwrap();
        cart
    }

    fn item() -> LineItem {
        LineItem { product_id: ProductId::new(1), name: "Widget".into(), quantity: 2, unit_price: Price::new(10), total: Price::new(20) }
    }

    #[test]
    fn test_cart_summary_shipping_threshold() {
        let small = OrderSummary::for_cart(&cart_with(4999, 1));
        assert_eq!(small.shipping, STANDARD_SHIPPING);
        assert_eq!(small.tax, Price::new(900)); // 899.82
        assert_eq!(small.total, Price::new(4999 + 500 + 900));

        let large = OrderSummary::for_cart(&cart_with(12999, 2));
        assert_eq!(large.shipping, Price::ZERO);

        let at_threshold = OrderSummary::for_cart(&cart_with(10000, 2));
        assert_eq!(at_threshold.shipping, STANDARD_SHIPPING);

        assert_eq!(OrderSummary::for_cart(&Cart::new()).total, Price::ZERO);
    }

    #[test]
    fn test_checkout_summary_coupon() {
        let cart = cart_with(8999, 1);
        let plain = OrderSummary::for_checkout(&cart, None);
        assert_eq!(plain.shipping, CHECKOUT_SHIPPING);
        assert_eq!(plain.discount, Price::ZERO);
        let coupon = OrderSummary::for_checkout(&cart, Some(" silk200 "));
        assert_eq!(coupon.discount, COUPON_DISCOUNT);
        assert_eq!(coupon.total, Price::new(plain.total.amount() - 200));
        assert_eq!(OrderSummary::for_checkout(&cart, Some("BOGUS")).discount, Price::ZERO);
    }

    #[test]
    fn test_order_workflow() {
        let mut order = Order::place("ORD-20250917-001", "3", vec![item()], OrderSummary::default(), PaymentMethod::Cod, None).unwrap();
        assert_eq!(order.status(), OrderStatus::Placed);
        assert_eq!(order.payment_status(), PaymentStatus::Pending);
        while order.status() != OrderStatus::Delivered {
            order.advance().unwrap();
        }
        assert_eq!(order.timeline().len(), 6);
        assert_eq!(order.payment_status(), PaymentStatus::Paid);
        assert_eq!(order.advance(), Err(OrderError::InvalidTransition(OrderStatus::Delivered)));
        assert_eq!(order.cancel(), Err(OrderError::CannotCancel(OrderStatus::Delivered)));
    }

    #[test]
    fn test_cancel_before_shipping_refunds() {
        let mut order = Order::place("ORD-1", "3", vec![item()], OrderSummary::default(), PaymentMethod::Upi, Some("  ".into())).unwrap();
        assert_eq!(order.notes(), None);
        order.advance().unwrap();
        order.cancel().unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        assert_eq!(order.payment_status(), PaymentStatus::Refunded);
        assert!(order.take_events().iter().any(|e| matches!(e, DomainEvent::Order(OrderEvent::Cancelled { .. }))));
    }

    #[test]
    fn test_empty_order_rejected() {
        let result = Order::place("ORD-2", "3", vec![], OrderSummary::default(), PaymentMethod::Card, None);
        assert!(matches!(result, Err(OrderError::NoItems)));
    }
}
