//! Fulfillment orchestrator: the post-payment pipeline.

use common::OrderId;
use domain::{Order, OrderStatus};
use order_store::{OrderStore, OrderStoreError};
use serde::{Deserialize, Serialize};

use crate::error::FulfillmentError;
use crate::notify::{Notification, NotificationFanout};
use crate::provisioner::ShipmentProvisioner;
use crate::services::CarrierClient;
use crate::signature::SignatureVerifier;

/// A payment confirmation callback from the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub gateway_order_ref: String,
    pub payment_ref: String,
    pub signature: String,
}

/// Outcome of a successful payment confirmation.
///
/// `shipment_error` is the deferred-shipment indicator: the payment is
/// confirmed but provisioning failed and must be retried out of band.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentConfirmation {
    pub order_id: OrderId,
    pub tracking_id: Option<String>,
    pub tracking_url: Option<String>,
    pub shipment_error: Option<String>,
}

/// Coordinates payment verification, order state transitions, shipment
/// provisioning, and notification fan-out.
///
/// The critical path (signature check, order lookup, mark paid) fails
/// loudly and mutates nothing on rejection. Everything downstream is
/// decomposed into independently-failable steps: a carrier outage defers
/// the shipment, a notification outage is logged and swallowed, and
/// neither ever makes a paid order look failed to the buyer.
pub struct FulfillmentOrchestrator<S, C>
where
    S: OrderStore,
    C: CarrierClient,
{
    store: S,
    verifier: SignatureVerifier,
    provisioner: ShipmentProvisioner<C>,
    notifications: NotificationFanout,
}

impl<S, C> FulfillmentOrchestrator<S, C>
where
    S: OrderStore,
    C: CarrierClient,
{
    /// Creates a new orchestrator.
    pub fn new(
        store: S,
        verifier: SignatureVerifier,
        provisioner: ShipmentProvisioner<C>,
        notifications: NotificationFanout,
    ) -> Self {
        Self {
            store,
            verifier,
            provisioner,
            notifications,
        }
    }

    /// Processes a payment confirmation callback.
    ///
    /// Safe under at-least-once delivery: a repeated callback for an
    /// already-confirmed order is a no-op that returns the existing
    /// tracking data without re-provisioning.
    #[tracing::instrument(
        skip(self, request),
        fields(gateway_order_ref = %request.gateway_order_ref)
    )]
    pub async fn confirm_payment(
        &self,
        request: ConfirmPaymentRequest,
    ) -> Result<PaymentConfirmation, FulfillmentError> {
        metrics::counter!("payment_confirmations_total").increment(1);
        let started = std::time::Instant::now();

        // 1. Verify the callback really came from the gateway. Nothing is
        // read or written before this check passes.
        if !self.verifier.verify(
            &request.gateway_order_ref,
            &request.payment_ref,
            &request.signature,
        )? {
            metrics::counter!("payment_confirmations_rejected").increment(1);
            tracing::warn!("payment confirmation rejected: bad signature");
            return Err(FulfillmentError::InvalidSignature);
        }

        // 2. Correlate to an order; unknown references fail closed.
        let order = match self
            .store
            .find_by_gateway_ref(&request.gateway_order_ref)
            .await
        {
            Ok(order) => order,
            Err(OrderStoreError::GatewayRefNotFound(gateway_ref)) => {
                metrics::counter!("payment_confirmations_rejected").increment(1);
                tracing::warn!("payment confirmation rejected: unknown order reference");
                return Err(FulfillmentError::OrderNotFound(gateway_ref));
            }
            Err(e) => return Err(e.into()),
        };

        if order.status == OrderStatus::Cancelled {
            metrics::counter!("payment_confirmations_rejected").increment(1);
            return Err(FulfillmentError::OrderNotFulfillable {
                order_id: order.id,
                status: order.status,
            });
        }

        // 3. Mark paid. From here on the confirmation is committed and is
        // not rolled back by downstream failures.
        let order = self.mark_paid(order).await?;

        // 4. Best-effort confirmation notices.
        self.dispatch_logged(&Notification::order_confirmed(&order))
            .await;

        // 5-8. Shipment provisioning and dispatch notices.
        let confirmation = self.ensure_shipment(order).await?;

        metrics::histogram!("confirmation_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        Ok(confirmation)
    }

    /// Provisions the shipment for an order outside the confirmation path.
    ///
    /// This is the retry surface for deferred shipments and the standalone
    /// create-shipment entry point; it runs the same guarded provisioning
    /// steps as `confirm_payment`.
    #[tracing::instrument(skip(self))]
    pub async fn provision_shipment(
        &self,
        order_id: OrderId,
    ) -> Result<PaymentConfirmation, FulfillmentError> {
        let order = self.store.get(order_id).await?;

        if !(order.status.can_mark_shipped() || order.status == OrderStatus::Shipped) {
            return Err(FulfillmentError::OrderNotFulfillable {
                order_id,
                status: order.status,
            });
        }

        self.ensure_shipment(order).await
    }

    /// Transitions the order to `Paid`, tolerating repeated delivery and
    /// concurrent confirmations.
    async fn mark_paid(&self, order: Order) -> Result<Order, FulfillmentError> {
        if order.status.is_paid_or_later() {
            return Ok(order);
        }

        match self
            .store
            .update_status(order.id, &[OrderStatus::Pending], OrderStatus::Paid)
            .await
        {
            Ok(updated) => {
                tracing::info!(order_id = %updated.id, "order marked paid");
                Ok(updated)
            }
            // A concurrent confirmation advanced the order first; reload
            // and continue with whatever it committed.
            Err(OrderStoreError::StatusConflict { .. }) => {
                let current = self.store.get(order.id).await?;
                if current.status.is_paid_or_later() {
                    Ok(current)
                } else {
                    Err(FulfillmentError::OrderNotFulfillable {
                        order_id: current.id,
                        status: current.status,
                    })
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Steps 5-8: idempotency guard, provisioning, shipment attachment,
    /// and dispatch notices.
    async fn ensure_shipment(&self, order: Order) -> Result<PaymentConfirmation, FulfillmentError> {
        // 5. Idempotency guard: an existing tracking id short-circuits and
        // is never re-provisioned or overwritten.
        let existing = order
            .shipment
            .clone()
            .filter(|s| !s.tracking_id.is_empty());
        if let Some(shipment) = existing {
            tracing::info!(
                order_id = %order.id,
                tracking_id = %shipment.tracking_id,
                "shipment already provisioned, skipping"
            );
            self.dispatch_logged(&Notification::shipment_dispatched(&order, &shipment))
                .await;
            return Ok(PaymentConfirmation {
                order_id: order.id,
                tracking_id: Some(shipment.tracking_id),
                tracking_url: Some(shipment.tracking_url),
                shipment_error: None,
            });
        }

        // 6-7. Provision; a carrier failure defers the shipment instead of
        // failing the already-confirmed payment.
        let shipment = match self.provisioner.provision(&order).await {
            Ok(shipment) => shipment,
            Err(e) => {
                metrics::counter!("shipments_deferred_total").increment(1);
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "shipment provisioning failed, deferring"
                );
                return Ok(PaymentConfirmation {
                    order_id: order.id,
                    tracking_id: None,
                    tracking_url: None,
                    shipment_error: Some(e.to_string()),
                });
            }
        };

        let order = match self.store.attach_shipment(order.id, shipment).await {
            Ok(updated) => {
                metrics::counter!("shipments_provisioned_total").increment(1);
                tracing::info!(order_id = %updated.id, "order marked shipped");
                updated
            }
            // Lost the attach race to a concurrent confirmation: reuse the
            // shipment that won instead of overwriting it.
            Err(OrderStoreError::ShipmentAlreadyAttached(_)) => self.store.get(order.id).await?,
            Err(e) => return Err(e.into()),
        };

        let Some(shipment) = order.shipment.clone() else {
            // Attach raced with another writer and the reload still shows
            // no shipment; report it as deferred so the retry path runs.
            return Ok(PaymentConfirmation {
                order_id: order.id,
                tracking_id: None,
                tracking_url: None,
                shipment_error: Some("shipment not visible after attach".to_string()),
            });
        };

        // 8. Best-effort dispatch notices.
        self.dispatch_logged(&Notification::shipment_dispatched(&order, &shipment))
            .await;

        Ok(PaymentConfirmation {
            order_id: order.id,
            tracking_id: Some(shipment.tracking_id),
            tracking_url: Some(shipment.tracking_url),
            shipment_error: None,
        })
    }

    /// Dispatches a notification and logs per-channel failures without
    /// letting any of them affect the pipeline.
    async fn dispatch_logged(&self, notification: &Notification) {
        for outcome in self.notifications.dispatch(notification).await {
            if let Err(e) = outcome.result {
                metrics::counter!("notifications_failed_total").increment(1);
                tracing::warn!(
                    channel = %outcome.channel,
                    kind = notification.kind(),
                    error = %e,
                    "notification dispatch failed"
                );
            }
        }
    }
}
