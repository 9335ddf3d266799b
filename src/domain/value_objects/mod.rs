//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Money value object, in whole rupees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn rupees(amount: u64) -> Self { Self(amount) }
    pub const fn amount(self) -> u64 { self.0 }
    pub fn checked_add(self, other: Money) -> Option<Money> { self.0.checked_add(other.0).map(Money) }
    pub fn saturating_add(self, other: Money) -> Money { Money(self.0.saturating_add(other.0)) }
    pub fn checked_multiply(self, qty: Quantity) -> Option<Money> { self.0.checked_mul(u64::from(qty.value())).map(Money) }
    pub fn multiply(self, qty: Quantity) -> Money { Money(self.0.saturating_mul(u64::from(qty.value()))) }

    /// Amount with thousands separators, e.g. `3,700`.
    pub fn grouped(self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "₹{}", self.0) }
}

/// EU shoe size. Only the sizes the product is cut in are representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ShoeSize { Eu37, Eu38, Eu39, Eu40, Eu41, Eu42 }

impl ShoeSize {
    pub const ALL: [ShoeSize; 6] = [Self::Eu37, Self::Eu38, Self::Eu39, Self::Eu40, Self::Eu41, Self::Eu42];

    pub const fn eu(self) -> u8 {
        match self {
            Self::Eu37 => 37,
            Self::Eu38 => 38,
            Self::Eu39 => 39,
            Self::Eu40 => 40,
            Self::Eu41 => 41,
            Self::Eu42 => 42,
        }
    }
}

impl TryFrom<u8> for ShoeSize {
    type Error = SizeError;

    fn try_from(eu: u8) -> Result<Self, Self::Error> {
        Self::ALL.into_iter().find(|s| s.eu() == eu).ok_or(SizeError::Unavailable(eu))
    }
}

impl From<ShoeSize> for u8 {
    fn from(size: ShoeSize) -> Self { size.eu() }
}

impl fmt::Display for ShoeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.eu()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("size EU {0} is not available")]
    Unavailable(u8),
}

/// Line quantity. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 { return Err(QuantityError::Zero); }
        Ok(Self(value))
    }

    /// Interprets a requested quantity: anything at or below zero means "none",
    /// anything above `u32::MAX` is clamped.
    pub fn from_requested(requested: i64) -> Option<Self> {
        if requested <= 0 { return None; }
        Some(Self(u32::try_from(requested).unwrap_or(u32::MAX)))
    }

    pub const fn value(self) -> u32 { self.0 }
    pub fn saturating_add(self, other: Quantity) -> Self { Self(self.0.saturating_add(other.0)) }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self { q.0 }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity must be at least 1")]
    Zero,
}

/// Identifies one shopper session (one browser tab).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    const MAX_LEN: usize = 64;

    pub fn new(value: impl Into<String>) -> Result<Self, SessionIdError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(SessionIdError::Empty); }
        if value.len() > Self::MAX_LEN { return Err(SessionIdError::TooLong); }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(SessionIdError::InvalidCharacter);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self { id.0 }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    #[error("session id is empty")]
    Empty,
    #[error("session id is too long")]
    TooLong,
    #[error("session id may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

/// Cart line identifier: product slug and size, plus a time-ordered suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    pub fn generate(name: &str, size: ShoeSize) -> Self {
        let slug: String = name
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self(format!("{slug}-{}-{}", size.eu(), Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for LineItemId {
    fn from(value: String) -> Self { Self(value) }
}

impl From<&str> for LineItemId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_grouping() {
        assert_eq!(Money::rupees(0).grouped(), "0");
        assert_eq!(Money::rupees(370).grouped(), "370");
        assert_eq!(Money::rupees(3700).grouped(), "3,700");
        assert_eq!(Money::rupees(1_234_567).grouped(), "1,234,567");
        assert_eq!(Money::rupees(7400).to_string(), "₹7400");
    }

    #[test]
    fn test_money_multiply_saturates() {
        let q = Quantity::new(u32::MAX).unwrap();
        assert_eq!(Money::rupees(3700).multiply(Quantity::new(2).unwrap()), Money::rupees(7400));
        assert_eq!(Money::rupees(u64::MAX).multiply(q), Money::rupees(u64::MAX));
        assert!(Money::rupees(u64::MAX).checked_multiply(q).is_none());
    }

    #[test]
    fn test_shoe_size() {
        assert_eq!(ShoeSize::try_from(40).unwrap(), ShoeSize::Eu40);
        assert_eq!(ShoeSize::try_from(43), Err(SizeError::Unavailable(43)));
        let parsed: ShoeSize = serde_json::from_str("37").unwrap();
        assert_eq!(parsed, ShoeSize::Eu37);
        assert!(serde_json::from_str::<ShoeSize>("36").is_err());
        assert_eq!(serde_json::to_string(&ShoeSize::Eu42).unwrap(), "42");
    }

    #[test]
    fn test_quantity() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::from_requested(0), None);
        assert_eq!(Quantity::from_requested(-3), None);
        assert_eq!(Quantity::from_requested(5).map(Quantity::value), Some(5));
        assert_eq!(Quantity::from_requested(i64::MAX).map(Quantity::value), Some(u32::MAX));
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn test_session_id() {
        assert_eq!(SessionId::new("  tab-1_a ").unwrap().as_str(), "tab-1_a");
        assert_eq!(SessionId::new(" "), Err(SessionIdError::Empty));
        assert_eq!(SessionId::new("a/b"), Err(SessionIdError::InvalidCharacter));
        assert_eq!(SessionId::new("x".repeat(65)), Err(SessionIdError::TooLong));
    }

    #[test]
    fn test_line_item_id_is_derived_from_name_and_size() {
        let a = LineItemId::generate("Urban Athletics Series", ShoeSize::Eu40);
        let b = LineItemId::generate("Urban Athletics Series", ShoeSize::Eu40);
        assert!(a.as_str().starts_with("urban-athletics-series-40-"));
        assert_ne!(a, b);
    }
}
