//! Urban Athletics Storefront
//!
//! Single-product shoe storefront backend.
//!
//! ## Features
//! - Product display data for the one shoe on sale
//! - Per-session cart with drawer state and derived totals
//! - Cash-on-delivery checkout with an explicit state machine
//! - Order notifications: WhatsApp to the shop owner, email to the customer
//!
//! No database: the notifications are the order record.

pub mod checkout;
pub mod config;
pub mod domain;
pub mod error;
pub mod notifications;
pub mod routes;
pub mod state;
pub mod store;

pub use checkout::{CheckoutError, CheckoutService, CheckoutState, OrderReceipt};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use routes::router;
pub use state::AppState;
pub use store::{CartStore, InMemoryCartStore};
