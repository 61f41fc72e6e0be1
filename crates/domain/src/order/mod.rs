//! Order module: record, status state machine, and value objects.

mod model;
mod status;
mod value_objects;

pub use model::Order;
pub use status::OrderStatus;
pub use value_objects::{Address, Money, OrderAmounts, OrderItem, ProductId, ShipmentInfo};
