//! JSON body shared by both notification functions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::aggregates::OrderSubmission;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderNotification {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub items: Vec<NotificationItem>,
    pub total_price: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub name: String,
    pub size: SizeLabel,
    pub quantity: u32,
    pub price: u64,
}

impl NotificationItem {
    pub fn line_total(&self) -> u64 { self.price.saturating_mul(u64::from(self.quantity)) }
}

/// Sizes go out as numbers; older clients sent them as strings, so both are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeLabel {
    Eu(u32),
    Text(String),
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eu(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&OrderSubmission> for OrderNotification {
    fn from(order: &OrderSubmission) -> Self {
        let customer = order.customer();
        Self {
            full_name: customer.full_name.clone(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            city: customer.city.clone(),
            state: customer.state.clone(),
            pincode: customer.pincode.clone(),
            items: order
                .lines()
                .iter()
                .map(|l| NotificationItem {
                    name: l.name.clone(),
                    size: SizeLabel::Eu(u32::from(l.size.eu())),
                    quantity: l.quantity.value(),
                    price: l.price.amount(),
                })
                .collect(),
            total_price: order.total_price().amount(),
        }
    }
}
