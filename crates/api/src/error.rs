//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fulfillment::FulfillmentError;
use order_store::OrderStoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Fulfillment pipeline rejection or failure.
    Fulfillment(FulfillmentError),
    /// Order store error outside the fulfillment pipeline.
    Store(OrderStoreError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Fulfillment(err) => fulfillment_error_to_response(err),
            ApiError::Store(err) => store_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn fulfillment_error_to_response(err: FulfillmentError) -> (StatusCode, String) {
    match &err {
        FulfillmentError::InvalidSignature => (StatusCode::UNAUTHORIZED, err.to_string()),
        FulfillmentError::OrderNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        FulfillmentError::OrderNotFulfillable { .. } => (StatusCode::CONFLICT, err.to_string()),
        FulfillmentError::SecretNotConfigured => {
            tracing::error!("payment webhook secret is not configured");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        FulfillmentError::Store(store_err) => store_error_status(store_err, err.to_string()),
    }
}

fn store_error_to_response(err: OrderStoreError) -> (StatusCode, String) {
    let message = err.to_string();
    store_error_status(&err, message)
}

fn store_error_status(err: &OrderStoreError, message: String) -> (StatusCode, String) {
    match err {
        OrderStoreError::NotFound(_) | OrderStoreError::GatewayRefNotFound(_) => {
            (StatusCode::NOT_FOUND, message)
        }
        OrderStoreError::DuplicateGatewayRef(_)
        | OrderStoreError::StatusConflict { .. }
        | OrderStoreError::ShipmentAlreadyAttached(_) => (StatusCode::CONFLICT, message),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, message),
    }
}

impl From<FulfillmentError> for ApiError {
    fn from(err: FulfillmentError) -> Self {
        ApiError::Fulfillment(err)
    }
}

impl From<OrderStoreError> for ApiError {
    fn from(err: OrderStoreError) -> Self {
        ApiError::Store(err)
    }
}
