//! Shipment provisioning: one idempotent unit of work wrapping shipment
//! creation, tracking-id allocation, and pickup scheduling.

use domain::{Order, ShipmentInfo};
use thiserror::Error;

use crate::services::{
    CarrierClient, CarrierError, CarrierItemLine, CarrierShipmentRequest,
};

/// Errors raised while provisioning a shipment.
///
/// These are recoverable from the orchestrator's viewpoint: the payment
/// stays confirmed and the shipment is deferred for an out-of-band retry.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The carrier rejected or failed a required call.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// The carrier returned neither a tracking id nor a shipment handle.
    #[error("Carrier returned neither a tracking id nor a shipment handle")]
    NoTrackingAssigned,
}

/// Carrier-facing configuration.
#[derive(Debug, Clone)]
pub struct CarrierConfig {
    /// Courier used when allocating a tracking id for a shipment handle.
    pub default_courier_id: i64,

    /// Public tracking URL template; `{tracking_id}` is substituted.
    pub tracking_url_template: String,

    /// Package weight default; per-product weights are not tracked.
    pub default_weight_grams: u32,

    /// Package dimension defaults in centimeters.
    pub default_length_cm: u32,
    pub default_width_cm: u32,
    pub default_height_cm: u32,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            default_courier_id: 1,
            tracking_url_template: "https://track.example.com/{tracking_id}".to_string(),
            default_weight_grams: 500,
            default_length_cm: 10,
            default_width_cm: 10,
            default_height_cm: 10,
        }
    }
}

impl CarrierConfig {
    /// Derives the public tracking URL for a tracking id.
    pub fn tracking_url(&self, tracking_id: &str) -> String {
        self.tracking_url_template
            .replace("{tracking_id}", tracking_id)
    }
}

/// Splits a recipient's full name into carrier first/last fields at the
/// first whitespace. A single-token name fills both fields.
fn split_recipient_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), trimmed.to_string()),
    }
}

/// Provisions shipments with the carrier network.
///
/// Both the payment-confirmation pipeline and the standalone shipment
/// entry point go through this one component, so the two paths cannot
/// drift apart.
pub struct ShipmentProvisioner<C: CarrierClient> {
    carrier: C,
    config: CarrierConfig,
}

impl<C: CarrierClient> ShipmentProvisioner<C> {
    /// Creates a provisioner over the given carrier client.
    pub fn new(carrier: C, config: CarrierConfig) -> Self {
        Self { carrier, config }
    }

    /// Builds the carrier shipment request for an order.
    pub fn build_request(&self, order: &Order) -> CarrierShipmentRequest {
        let (first_name, last_name) = split_recipient_name(&order.address.recipient_name);

        CarrierShipmentRequest {
            order_ref: order.id.to_string(),
            first_name,
            last_name,
            email: order.address.email.clone(),
            phone: order.address.phone.clone(),
            street: order.address.street.clone(),
            city: order.address.city.clone(),
            state: order.address.state.clone(),
            postal_code: order.address.postal_code.clone(),
            payment_mode: "Prepaid",
            weight_grams: self.config.default_weight_grams,
            length_cm: self.config.default_length_cm,
            width_cm: self.config.default_width_cm,
            height_cm: self.config.default_height_cm,
            declared_value_cents: order.amounts.total.cents(),
            items: order
                .items
                .iter()
                .map(|item| CarrierItemLine {
                    name: item.name.clone(),
                    sku: item.product_id.to_string(),
                    units: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
        }
    }

    /// Creates a shipment for the order and returns its tracking data.
    ///
    /// A tracking id in the create response is used directly; otherwise one
    /// is allocated for the returned shipment handle. Pickup scheduling is
    /// best-effort: its failure never invalidates the tracking id already
    /// obtained.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn provision(&self, order: &Order) -> Result<ShipmentInfo, ProvisionError> {
        let request = self.build_request(order);
        let response = self.carrier.create_shipment(&request).await?;

        let direct_tracking = response.tracking_id.filter(|id| !id.is_empty());
        let (tracking_id, courier_name) = match (direct_tracking, &response.shipment_handle) {
            (Some(tracking_id), _) => {
                (tracking_id, response.courier_name.unwrap_or_default())
            }
            (None, Some(handle)) => {
                let assignment = self
                    .carrier
                    .assign_tracking(handle, self.config.default_courier_id)
                    .await?;
                (assignment.tracking_id, assignment.courier_name)
            }
            (None, None) => return Err(ProvisionError::NoTrackingAssigned),
        };

        if let Some(handle) = &response.shipment_handle
            && let Err(e) = self.carrier.schedule_pickup(handle).await
        {
            tracing::warn!(error = %e, "pickup scheduling failed, shipment remains valid");
        }

        Ok(ShipmentInfo {
            tracking_url: self.config.tracking_url(&tracking_id),
            tracking_id,
            courier_name,
        })
    }
}
