use common::OrderId;
use domain::OrderStatus;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// No order exists with the given ID.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// No order exists with the given gateway order reference.
    #[error("No order found for gateway reference '{0}'")]
    GatewayRefNotFound(String),

    /// An order with the same gateway order reference already exists.
    #[error("An order with gateway reference '{0}' already exists")]
    DuplicateGatewayRef(String),

    /// A conditional status update found the order in a status outside the
    /// expected set.
    #[error("Status conflict for order {order_id}: current status is {current}")]
    StatusConflict {
        order_id: OrderId,
        current: OrderStatus,
    },

    /// A shipment is already attached to the order.
    #[error("Order {0} already has a shipment attached")]
    ShipmentAlreadyAttached(OrderId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
