//! Fulfillment error types.

use common::OrderId;
use domain::OrderStatus;
use order_store::OrderStoreError;
use thiserror::Error;

use crate::signature::SignatureError;

/// Errors that abort the payment-confirmation pipeline.
///
/// Only the fatal/configuration and rejection classes appear here:
/// shipment provisioning failures are deferred (reported inside a
/// successful result), and notification failures are logged and swallowed.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// The webhook signing secret is not configured (deployment defect).
    #[error("Payment webhook secret is not configured")]
    SecretNotConfigured,

    /// The supplied signature does not match the recomputed one.
    #[error("Payment signature verification failed")]
    InvalidSignature,

    /// No order correlates to the gateway order reference.
    #[error("No order found for gateway reference '{0}'")]
    OrderNotFound(String),

    /// The order exists but its status does not admit fulfillment
    /// (e.g. it was cancelled before the confirmation arrived).
    #[error("Order {order_id} cannot be fulfilled: status is {status}")]
    OrderNotFulfillable {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// Order store error on the critical path.
    #[error("Order store error: {0}")]
    Store(#[from] OrderStoreError),
}

impl From<SignatureError> for FulfillmentError {
    fn from(e: SignatureError) -> Self {
        match e {
            SignatureError::SecretNotConfigured => FulfillmentError::SecretNotConfigured,
        }
    }
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
