//! External collaborator interfaces and their in-memory implementations.

pub mod carrier;
pub mod channels;

pub use carrier::{
    CarrierClient, CarrierError, CarrierItemLine, CarrierShipmentRequest, CreateShipmentResponse,
    InMemoryCarrierClient, TrackingAssignment,
};
pub use channels::{ChannelError, NotificationChannel, RecordingChannel};
