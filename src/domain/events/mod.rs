//! Domain events
use crate::domain::value_objects::{LineItemId, ShoeSize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { item_id: LineItemId, size: ShoeSize, quantity: u32 },
    QuantityChanged { item_id: LineItemId, quantity: u32 },
    ItemRemoved { item_id: LineItemId },
    Cleared { removed_lines: usize },
}
