//! Domain model: value objects, the cart and product aggregates, and the
//! order snapshot taken at checkout.
pub mod aggregates;
pub mod events;
pub mod value_objects;
