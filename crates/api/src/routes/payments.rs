//! Payment confirmation webhook endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use fulfillment::{CarrierClient, ConfirmPaymentRequest, PaymentConfirmation};
use order_store::OrderStore;

use crate::AppState;
use crate::error::ApiError;

/// POST /payments/confirm — the gateway's payment confirmation callback.
///
/// Returns the confirmation result: tracking data when a shipment was
/// provisioned, or a `shipment_error` deferred indicator when the carrier
/// was unavailable. Rejections (bad signature, unknown order) never mutate
/// state.
#[tracing::instrument(skip(state, request), fields(gateway_order_ref = %request.gateway_order_ref))]
pub async fn confirm<S, C>(
    State(state): State<Arc<AppState<S, C>>>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<PaymentConfirmation>, ApiError>
where
    S: OrderStore + Clone + 'static,
    C: CarrierClient + 'static,
{
    let confirmation = state.orchestrator.confirm_payment(request).await?;
    Ok(Json(confirmation))
}
