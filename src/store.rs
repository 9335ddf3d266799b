//! Session-scoped cart storage.
//!
//! Handlers never reach a global cart: they go through a `CartStore` carried
//! in the router state, so tests can hand in their own.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::domain::aggregates::Cart;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::SessionId;

pub trait CartStore: Send + Sync + 'static {
    /// Copy of the session's cart; an unseen session has an empty one.
    fn snapshot(&self, session: &SessionId) -> Cart;

    /// Applies `f` to the session's cart and returns the cart afterwards.
    fn mutate(&self, session: &SessionId, f: &mut dyn FnMut(&mut Cart)) -> Cart;
}

/// Process-memory store. Carts vanish with the process, like a browser tab's state.
#[derive(Default)]
pub struct InMemoryCartStore {
    carts: Mutex<HashMap<SessionId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self { Self::default() }

    pub fn session_count(&self) -> usize {
        self.carts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl CartStore for InMemoryCartStore {
    fn snapshot(&self, session: &SessionId) -> Cart {
        let carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);
        carts.get(session).cloned().unwrap_or_default()
    }

    /// Idle carts are not kept: an entry exists only while the session has
    /// lines or an open drawer.
    fn mutate(&self, session: &SessionId, f: &mut dyn FnMut(&mut Cart)) -> Cart {
        let mut carts = self.carts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cart = carts.remove(session).unwrap_or_default();
        f(&mut cart);
        for event in cart.take_events() {
            log_event(session, &event);
        }
        if !cart.is_idle() {
            carts.insert(session.clone(), cart.clone());
        }
        cart
    }
}

fn log_event(session: &SessionId, event: &DomainEvent) {
    match event {
        DomainEvent::Cart(CartEvent::ItemAdded { item_id, size, quantity }) => {
            tracing::debug!(%session, %item_id, %size, quantity, "cart line added");
        }
        DomainEvent::Cart(CartEvent::QuantityChanged { item_id, quantity }) => {
            tracing::debug!(%session, %item_id, quantity, "cart quantity changed");
        }
        DomainEvent::Cart(CartEvent::ItemRemoved { item_id }) => {
            tracing::debug!(%session, %item_id, "cart line removed");
        }
        DomainEvent::Cart(CartEvent::Cleared { removed_lines }) => {
            tracing::debug!(%session, removed_lines, "cart cleared");
        }
    }
}
