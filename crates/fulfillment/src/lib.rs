//! Post-payment fulfillment orchestration.
//!
//! Once a buyer's payment is authorized, this crate verifies the gateway's
//! payment confirmation, transitions the order through its lifecycle,
//! provisions a shipment with the carrier, and fans out notifications.
//!
//! The pipeline is split into a strict critical path (signature check,
//! order lookup, status update) and independently-failable downstream
//! steps: a carrier outage defers the shipment instead of failing the
//! confirmed payment, and notification failures are logged but never
//! surfaced.

pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod provisioner;
pub mod services;
pub mod signature;

pub use error::FulfillmentError;
pub use notify::{DispatchOutcome, Notification, NotificationFanout};
pub use orchestrator::{ConfirmPaymentRequest, FulfillmentOrchestrator, PaymentConfirmation};
pub use provisioner::{CarrierConfig, ProvisionError, ShipmentProvisioner};
pub use services::{
    CarrierClient, CarrierError, CarrierItemLine, CarrierShipmentRequest, ChannelError,
    CreateShipmentResponse, InMemoryCarrierClient, NotificationChannel, RecordingChannel,
    TrackingAssignment,
};
pub use signature::{SignatureError, SignatureVerifier};
