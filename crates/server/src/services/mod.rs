//! Business services that span more than one table.
//!
//! - [`OrderService`] - Atomic order placement, update, read and delete

pub mod orders;

pub use orders::OrderService;
