//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, ProductError};
pub use order::{CustomerDetails, OrderError, OrderLine, OrderSubmission};
pub use cart::{Cart, CartItem, NewCartItem};
