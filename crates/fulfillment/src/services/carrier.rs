//! Carrier client trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error returned by carrier operations.
#[derive(Debug, Error, Clone)]
#[error("Carrier error: {0}")]
pub struct CarrierError(pub String);

/// One item line of a carrier shipment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierItemLine {
    pub name: String,
    pub sku: String,
    pub units: u32,
    pub unit_price_cents: i64,
}

/// Request sent to the carrier to create a shipment.
///
/// Payment mode is always prepaid: this storefront only supports pre-paid
/// orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierShipmentRequest {
    /// Storefront order reference forwarded to the carrier.
    pub order_ref: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub payment_mode: &'static str,
    pub weight_grams: u32,
    pub length_cm: u32,
    pub width_cm: u32,
    pub height_cm: u32,
    pub declared_value_cents: i64,
    pub items: Vec<CarrierItemLine>,
}

/// Response from the carrier's create-shipment operation.
///
/// Some carrier accounts assign a tracking id at creation; others return
/// an internal shipment handle that a tracking id must be allocated for
/// in a second call.
#[derive(Debug, Clone, Default)]
pub struct CreateShipmentResponse {
    pub shipment_handle: Option<String>,
    pub tracking_id: Option<String>,
    pub courier_name: Option<String>,
}

/// Result of allocating a tracking id for a shipment handle.
#[derive(Debug, Clone)]
pub struct TrackingAssignment {
    pub tracking_id: String,
    pub courier_name: String,
}

/// Trait for carrier network operations.
#[async_trait]
pub trait CarrierClient: Send + Sync {
    /// Creates a shipment with the carrier.
    async fn create_shipment(
        &self,
        request: &CarrierShipmentRequest,
    ) -> Result<CreateShipmentResponse, CarrierError>;

    /// Allocates a tracking id for a previously created shipment handle,
    /// using the given courier.
    async fn assign_tracking(
        &self,
        shipment_handle: &str,
        courier_id: i64,
    ) -> Result<TrackingAssignment, CarrierError>;

    /// Requests pickup scheduling for a shipment handle.
    async fn schedule_pickup(&self, shipment_handle: &str) -> Result<(), CarrierError>;
}

#[derive(Debug, Default)]
struct InMemoryCarrierState {
    create_requests: Vec<CarrierShipmentRequest>,
    assign_calls: u32,
    pickup_calls: u32,
    next_id: u32,
    tracking_on_create: bool,
    fail_on_create: bool,
    fail_on_assign: bool,
    fail_on_pickup: bool,
}

/// In-memory carrier client for testing.
///
/// By default create_shipment returns only a shipment handle and the
/// tracking id comes from `assign_tracking`; `set_tracking_on_create`
/// switches to the single-call account behavior.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCarrierClient {
    state: Arc<RwLock<InMemoryCarrierState>>,
}

impl InMemoryCarrierClient {
    /// Creates a new in-memory carrier client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures create_shipment to return a tracking id directly.
    pub fn set_tracking_on_create(&self, direct: bool) {
        self.state.write().unwrap().tracking_on_create = direct;
    }

    /// Configures the client to fail on create_shipment calls.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Configures the client to fail on assign_tracking calls.
    pub fn set_fail_on_assign(&self, fail: bool) {
        self.state.write().unwrap().fail_on_assign = fail;
    }

    /// Configures the client to fail on schedule_pickup calls.
    pub fn set_fail_on_pickup(&self, fail: bool) {
        self.state.write().unwrap().fail_on_pickup = fail;
    }

    /// Returns the number of create_shipment calls made.
    pub fn create_call_count(&self) -> usize {
        self.state.read().unwrap().create_requests.len()
    }

    /// Returns the number of assign_tracking calls made.
    pub fn assign_call_count(&self) -> u32 {
        self.state.read().unwrap().assign_calls
    }

    /// Returns the number of schedule_pickup calls made.
    pub fn pickup_call_count(&self) -> u32 {
        self.state.read().unwrap().pickup_calls
    }

    /// Returns the most recent create_shipment request.
    pub fn last_request(&self) -> Option<CarrierShipmentRequest> {
        self.state.read().unwrap().create_requests.last().cloned()
    }
}

#[async_trait]
impl CarrierClient for InMemoryCarrierClient {
    async fn create_shipment(
        &self,
        request: &CarrierShipmentRequest,
    ) -> Result<CreateShipmentResponse, CarrierError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(CarrierError("Carrier unavailable".to_string()));
        }

        state.next_id += 1;
        state.create_requests.push(request.clone());

        if state.tracking_on_create {
            Ok(CreateShipmentResponse {
                shipment_handle: Some(format!("sh_{}", state.next_id)),
                tracking_id: Some(format!("AWB-{:04}", state.next_id)),
                courier_name: Some("Acme Logistics".to_string()),
            })
        } else {
            Ok(CreateShipmentResponse {
                shipment_handle: Some(format!("sh_{}", state.next_id)),
                tracking_id: None,
                courier_name: None,
            })
        }
    }

    async fn assign_tracking(
        &self,
        _shipment_handle: &str,
        _courier_id: i64,
    ) -> Result<TrackingAssignment, CarrierError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_assign {
            return Err(CarrierError("No couriers serviceable".to_string()));
        }

        state.assign_calls += 1;
        Ok(TrackingAssignment {
            tracking_id: format!("AWB-{:04}", state.next_id),
            courier_name: "Acme Logistics".to_string(),
        })
    }

    async fn schedule_pickup(&self, _shipment_handle: &str) -> Result<(), CarrierError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_pickup {
            return Err(CarrierError("Pickup slots exhausted".to_string()));
        }

        state.pickup_calls += 1;
        Ok(())
    }
}
