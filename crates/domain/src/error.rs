//! Domain validation errors.

use thiserror::Error;

/// Errors raised when constructing or validating an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The gateway order reference is empty.
    #[error("Gateway order reference must not be empty")]
    EmptyGatewayRef,

    /// The order has no items.
    #[error("Order must contain at least one item")]
    NoItems,

    /// An item has a zero quantity.
    #[error("Invalid quantity for product {product_id}: quantity must be at least 1")]
    InvalidQuantity { product_id: String },

    /// An item has a negative unit price.
    #[error("Invalid price for product {product_id}: unit price must not be negative")]
    InvalidPrice { product_id: String },

    /// The order amounts are inconsistent or negative.
    #[error("Invalid amounts: {reason}")]
    InvalidAmounts { reason: String },
}
