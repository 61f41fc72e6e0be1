//! Notification fan-out across independent delivery channels.

use std::sync::Arc;

use common::OrderId;
use domain::{Money, Order, ShipmentInfo};
use futures_util::future::join_all;
use serde::Serialize;

use crate::services::{ChannelError, NotificationChannel};

/// A customer- or operator-facing notification payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    /// Payment for an order was confirmed.
    OrderConfirmed {
        order_id: OrderId,
        recipient_name: String,
        recipient_email: String,
        total: Money,
        item_count: usize,
    },

    /// A shipment was handed to the carrier.
    ShipmentDispatched {
        order_id: OrderId,
        recipient_name: String,
        recipient_email: String,
        tracking_id: String,
        tracking_url: String,
        courier_name: String,
    },
}

impl Notification {
    /// Builds the order-confirmed payload from an order.
    pub fn order_confirmed(order: &Order) -> Self {
        Notification::OrderConfirmed {
            order_id: order.id,
            recipient_name: order.address.recipient_name.clone(),
            recipient_email: order.address.email.clone(),
            total: order.amounts.total,
            item_count: order.item_count(),
        }
    }

    /// Builds the shipment-dispatched payload from an order and its shipment.
    pub fn shipment_dispatched(order: &Order, shipment: &ShipmentInfo) -> Self {
        Notification::ShipmentDispatched {
            order_id: order.id,
            recipient_name: order.address.recipient_name.clone(),
            recipient_email: order.address.email.clone(),
            tracking_id: shipment.tracking_id.clone(),
            tracking_url: shipment.tracking_url.clone(),
            courier_name: shipment.courier_name.clone(),
        }
    }

    /// Returns the notification kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::OrderConfirmed { .. } => "order-confirmed",
            Notification::ShipmentDispatched { .. } => "shipment-dispatched",
        }
    }
}

/// The result of one channel's delivery attempt.
///
/// Failures are explicit values here, not swallowed exceptions: the caller
/// decides to log them, and nothing in the outcome affects control flow.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Name of the channel that was attempted.
    pub channel: String,

    /// The delivery result.
    pub result: Result<(), ChannelError>,
}

/// Dispatches notifications to every configured channel independently.
///
/// Channels are isolated from each other: all are attempted concurrently
/// and one channel's failure never prevents another's attempt.
#[derive(Clone, Default)]
pub struct NotificationFanout {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationFanout {
    /// Creates a fan-out over the given channels.
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Delivers one notification to every channel, returning the
    /// per-channel outcomes.
    pub async fn dispatch(&self, notification: &Notification) -> Vec<DispatchOutcome> {
        let attempts = self.channels.iter().map(|channel| async move {
            DispatchOutcome {
                channel: channel.name().to_string(),
                result: channel.send(notification).await,
            }
        });

        join_all(attempts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RecordingChannel;

    fn make_notification() -> Notification {
        Notification::OrderConfirmed {
            order_id: OrderId::new(),
            recipient_name: "Jane Doe".to_string(),
            recipient_email: "jane@example.com".to_string(),
            total: Money::from_cents(550),
            item_count: 1,
        }
    }

    fn fanout_with(
        channels: &[RecordingChannel],
    ) -> NotificationFanout {
        NotificationFanout::new(
            channels
                .iter()
                .map(|c| Arc::new(c.clone()) as Arc<dyn NotificationChannel>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_dispatches_to_all_channels() {
        let channels = [
            RecordingChannel::new("customer-email"),
            RecordingChannel::new("operator-email"),
            RecordingChannel::new("customer-messaging"),
        ];
        let fanout = fanout_with(&channels);

        let outcomes = fanout.dispatch(&make_notification()).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
        for channel in &channels {
            assert_eq!(channel.sent_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_one_failing_channel_does_not_block_others() {
        let channels = [
            RecordingChannel::new("customer-email"),
            RecordingChannel::new("operator-email"),
        ];
        channels[0].set_fail(true);
        let fanout = fanout_with(&channels);

        let outcomes = fanout.dispatch(&make_notification()).await;

        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert_eq!(channels[0].sent_count(), 0);
        assert_eq!(channels[1].sent_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_fanout_is_a_no_op() {
        let fanout = NotificationFanout::default();
        let outcomes = fanout.dispatch(&make_notification()).await;
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_notification_kinds() {
        assert_eq!(make_notification().kind(), "order-confirmed");
    }
}
