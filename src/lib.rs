//! SilkCraft Storefront
//!
//! Core of a saree storefront: the pieces of shopping logic that sit behind
//! the pages.
//!
//! ## Features
//! - Catalog queries: search, category/color/price filters, sorting, paging
//! - Shopping cart persisted to durable key-value storage
//! - Mock authentication with customer, cashier and admin roles
//! - Order summary pricing and mock checkout
//! - Role-based navigation and route guarding
//! - Per-client sessions keyed by an issued session id
//! - JSON HTTP API over all of the above

use thiserror::Error;

pub mod api;
pub mod auth;
pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod storefront;

pub use auth::{AuthContext, AuthError, AuthUser, Role};
pub use cart_store::CartStore;
pub use catalog::Catalog;
pub use checkout::CheckoutError;
pub use config::AppConfig;
pub use domain::aggregates::{Cart, CartLine, Order, Product};
pub use domain::value_objects::{Price, ProductId};
pub use session::{SessionId, SessionManager};
pub use storage::StorageError;
pub use storefront::Storefront;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
