//! Cart Aggregate

use serde::Serialize;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{LineItemId, Money, Quantity, ShoeSize};

/// A session's cart: insertion-ordered lines plus the drawer flag.
///
/// Totals are never stored; `total_items` and `total_price` fold over the
/// current lines on every call.
#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    is_open: bool,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: LineItemId,
    pub name: String,
    pub price: Money,
    pub size: ShoeSize,
    pub quantity: Quantity,
    pub image: String,
}

impl CartItem {
    pub fn line_total(&self) -> Money { self.price.multiply(self.quantity) }
}

/// Incoming line for `Cart::add_item`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCartItem {
    pub name: String,
    pub price: Money,
    pub size: ShoeSize,
    pub quantity: Quantity,
    pub image: String,
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn is_open(&self) -> bool { self.is_open }
    pub fn find(&self, id: &LineItemId) -> Option<&CartItem> { self.items.iter().find(|i| &i.id == id) }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.value())).sum()
    }

    pub fn total_price(&self) -> Money {
        self.items.iter().fold(Money::ZERO, |acc, i| acc.saturating_add(i.line_total()))
    }

    /// Merges into the existing (name, size) line if there is one, otherwise
    /// appends. Returns the id of the line that now holds the quantity.
    pub fn add_item(&mut self, item: NewCartItem) -> LineItemId {
        if let Some(existing) = self.items.iter_mut().find(|i| i.name == item.name && i.size == item.size) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            let (id, quantity) = (existing.id.clone(), existing.quantity.value());
            self.raise_event(CartEvent::QuantityChanged { item_id: id.clone(), quantity });
            return id;
        }
        let id = LineItemId::generate(&item.name, item.size);
        self.raise_event(CartEvent::ItemAdded { item_id: id.clone(), size: item.size, quantity: item.quantity.value() });
        self.items.push(CartItem {
            id: id.clone(),
            name: item.name,
            price: item.price,
            size: item.size,
            quantity: item.quantity,
            image: item.image,
        });
        id
    }

    /// Removes the line; returns whether anything was removed.
    pub fn remove_item(&mut self, id: &LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.raise_event(CartEvent::ItemRemoved { item_id: id.clone() });
        }
        removed
    }

    /// Sets a line's quantity. Zero or below removes the line; unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &LineItemId, requested: i64) {
        let Some(quantity) = Quantity::from_requested(requested) else {
            self.remove_item(id);
            return;
        };
        if let Some(item) = self.items.iter_mut().find(|i| &i.id == id) {
            item.quantity = quantity;
            self.raise_event(CartEvent::QuantityChanged { item_id: id.clone(), quantity: quantity.value() });
        }
    }

    /// Takes `quantity` off the (name, size) line, removing it once nothing is
    /// left. Whatever was added on top of the deducted amount stays.
    pub fn deduct(&mut self, name: &str, size: ShoeSize, quantity: Quantity) {
        let Some(item) = self.items.iter_mut().find(|i| i.name == name && i.size == size) else { return };
        let remaining = i64::from(item.quantity.value()) - i64::from(quantity.value());
        let id = item.id.clone();
        self.update_quantity(&id, remaining);
    }

    /// Empty with the drawer shut: indistinguishable from a session never seen.
    pub fn is_idle(&self) -> bool { self.items.is_empty() && !self.is_open }

    pub fn clear(&mut self) {
        let removed_lines = self.items.len();
        self.items.clear();
        self.raise_event(CartEvent::Cleared { removed_lines });
    }

    pub fn open_drawer(&mut self) { self.is_open = true; }
    pub fn close_drawer(&mut self) { self.is_open = false; }
    pub fn set_drawer_open(&mut self, open: bool) { self.is_open = open; }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
}
