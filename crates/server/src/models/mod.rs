//! Domain models for the order desk.
//!
//! These types represent validated domain objects separate from database row
//! types (which live next to their queries in `db`) and from request bodies
//! (which live next to their handlers in `routes`).

pub mod customer;
pub mod item;
pub mod order;

pub use customer::{Customer, CustomerInput};
pub use item::{Item, ItemInput};
pub use order::{NewOrder, Order, OrderDetail, OrderLine, OrderUpdate};
