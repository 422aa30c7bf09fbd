//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Numeric product identifier, unique across the catalog
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    pub const fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
}

impl From<u32> for ProductId {
    fn from(value: u32) -> Self { Self(value) }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Price in whole rupees.
///
/// Catalog prices carry no fractional part, so arithmetic stays in integers.
/// Percentages round half-up, matching how the storefront displays GST.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn new(amount: i64) -> Self { Self(amount) }
    pub fn amount(&self) -> i64 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }

    pub fn multiply(&self, qty: u32) -> Price { Price(self.0.saturating_mul(i64::from(qty))) }

    /// `pct` percent of this price, rounded to the nearest rupee.
    pub fn percent(&self, pct: i64) -> Price {
        let scaled = self.0.saturating_mul(pct);
        Price((scaled + 50).div_euclid(100))
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(&self, other: Price) -> Price { Price((self.0 - other.0).max(0)) }
}

impl Add for Price {
    type Output = Price;
    fn add(self, rhs: Price) -> Price { Price(self.0.saturating_add(rhs.0)) }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price { iter.fold(Price::ZERO, Add::add) }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 { grouped.push(','); }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}₹{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(15999).to_string(), "₹15,999");
        assert_eq!(Price::new(500).to_string(), "₹500");
        assert_eq!(Price::new(1234567).to_string(), "₹1,234,567");
        assert_eq!(Price::new(-200).to_string(), "-₹200");
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(Price::new(15999).percent(18), Price::new(2880)); // 2879.82
        assert_eq!(Price::new(250).percent(18), Price::new(45));
        assert_eq!(Price::new(25).percent(18), Price::new(5)); // 4.5
    }

    #[test]
    fn test_price_arithmetic() {
        let total: Price = [Price::new(100), Price::new(50)].into_iter().sum();
        assert_eq!(total, Price::new(150));
        assert_eq!(Price::new(12999).multiply(3), Price::new(38997));
        assert_eq!(Price::new(100).saturating_sub(Price::new(250)), Price::ZERO);
    }
}
