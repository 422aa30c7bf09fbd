//! Product Aggregate
//!
//! Products are seeded reference data: the storefront reads them but never
//! mutates them at runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{Price, ProductId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub fabric: String,
    pub color: String,
    pub category: String,
    pub subcategory: String,
    pub rating: f32,
    pub reviews: u32,
    pub images: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub specifications: Specifications,
    pub is_new: bool,
    pub in_stock: bool,
    pub stock_quantity: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    pub fabric: String,
    pub weave: String,
    pub length: String,
    pub width: String,
    pub blouse_piece: bool,
    pub care_instructions: Vec<String>,
    pub origin: String,
}

impl Product {
    /// Whether the product can be put in a cart at all.
    pub fn is_available(&self) -> bool { self.in_stock && self.stock_quantity > 0 }

    pub fn savings(&self) -> Option<Price> {
        self.original_price.map(|original| original.saturating_sub(self.price))
    }

    /// Case-insensitive free-text match over name, fabric, color and tags.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() { return true; }
        self.name.to_lowercase().contains(needle)
            || self.fabric.to_lowercase().contains(needle)
            || self.color.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() { return Err(ProductError::MissingName(self.id)); }
        if self.price.amount() <= 0 { return Err(ProductError::InvalidPrice(self.id)); }
        if let Some(original) = self.original_price {
            if original <= self.price { return Err(ProductError::OriginalPriceNotHigher(self.id)); }
        }
        if !(0.0..=5.0).contains(&self.rating) { return Err(ProductError::RatingOutOfRange(self.id)); }
        if self.in_stock != (self.stock_quantity > 0) { return Err(ProductError::StockFlagMismatch(self.id)); }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("product {0} has no name")]
    MissingName(ProductId),
    #[error("product {0} has a non-positive price")]
    InvalidPrice(ProductId),
    #[error("product {0} original price must exceed its price")]
    OriginalPriceNotHigher(ProductId),
    #[error("product {0} rating must be between 0 and 5")]
    RatingOutOfRange(ProductId),
    #[error("product {0} in-stock flag disagrees with its stock quantity")]
    StockFlagMismatch(ProductId),
}
