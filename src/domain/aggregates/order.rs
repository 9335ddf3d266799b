//! Order submission snapshot
//!
//! There is no order table: an `OrderSubmission` lives only long enough to be
//! turned into notification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::domain::aggregates::cart::Cart;
use crate::domain::value_objects::{Money, Quantity, ShoeSize};

/// Contact and shipping fields from the checkout form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerDetails {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Street address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "Pincode is required"))]
    pub pincode: String,
}

impl CustomerDetails {
    /// Trims every field; a blank email means none was given.
    pub fn normalized(self) -> Self {
        let trim = |s: String| s.trim().to_string();
        Self {
            full_name: trim(self.full_name),
            phone: trim(self.phone),
            email: self.email.map(trim).filter(|e| !e.is_empty()),
            address: trim(self.address),
            city: trim(self.city),
            state: trim(self.state),
            pincode: trim(self.pincode),
        }
    }

    pub fn validated(self) -> Result<Self, OrderError> {
        let details = self.normalized();
        details.validate().map_err(|errors| {
            let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
            fields.sort_by_key(|(field, _)| *field);
            let messages = fields
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| {
                        e.message.as_ref().map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                    })
                })
                .collect();
            OrderError::InvalidDetails(messages)
        })?;
        Ok(details)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderLine {
    pub name: String,
    pub size: ShoeSize,
    pub quantity: Quantity,
    pub price: Money,
}

impl OrderLine {
    pub fn line_total(&self) -> Money { self.price.multiply(self.quantity) }
}

#[derive(Clone, Debug)]
pub struct OrderSubmission {
    reference: Uuid,
    customer: CustomerDetails,
    lines: Vec<OrderLine>,
    total_items: u64,
    total_price: Money,
    submitted_at: DateTime<Utc>,
}

impl OrderSubmission {
    /// Copies the cart lines and totals. Totals use checked arithmetic so an
    /// absurd cart fails here instead of producing a wrapped amount.
    pub fn snapshot(cart: &Cart, customer: CustomerDetails) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        let lines: Vec<OrderLine> = cart
            .items()
            .iter()
            .map(|i| OrderLine { name: i.name.clone(), size: i.size, quantity: i.quantity, price: i.price })
            .collect();
        let total_price = lines.iter().try_fold(Money::ZERO, |acc, l| {
            l.price.checked_multiply(l.quantity).and_then(|t| acc.checked_add(t))
        }).ok_or(OrderError::TotalOverflow)?;
        let total_items = lines.iter().map(|l| u64::from(l.quantity.value())).sum();
        Ok(Self { reference: Uuid::now_v7(), customer, lines, total_items, total_price, submitted_at: Utc::now() })
    }

    pub fn reference(&self) -> Uuid { self.reference }
    pub fn customer(&self) -> &CustomerDetails { &self.customer }
    pub fn lines(&self) -> &[OrderLine] { &self.lines }
    pub fn total_items(&self) -> u64 { self.total_items }
    pub fn total_price(&self) -> Money { self.total_price }
    pub fn submitted_at(&self) -> DateTime<Utc> { self.submitted_at }
    pub fn has_email(&self) -> bool { self.customer.email.is_some() }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Your cart is empty!")]
    NoItems,
    #[error("{}", .0.join("; "))]
    InvalidDetails(Vec<String>),
    #[error("order total is out of range")]
    TotalOverflow,
}
