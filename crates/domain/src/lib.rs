//! Domain layer for the storefront: the order record, its lifecycle state
//! machine, and the value objects the fulfillment pipeline extracts from it.

pub mod error;
pub mod order;

pub use common::OrderId;
pub use error::OrderError;
pub use order::{
    Address, Money, Order, OrderAmounts, OrderItem, OrderStatus, ProductId, ShipmentInfo,
};
