//! Order lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──► Paid ──► Shipped ──► Delivered
///    │          │
///    └──────────┴──► Cancelled
/// ```
///
/// The fulfillment pipeline only ever performs `Pending → Paid` and
/// `Paid → Shipped`; delivery and cancellation are recorded elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order created at checkout, payment not yet confirmed.
    #[default]
    Pending,

    /// Payment confirmed, shipment not yet provisioned.
    Paid,

    /// Shipment provisioned and handed to the carrier.
    Shipped,

    /// Carrier confirmed delivery (terminal state).
    Delivered,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if payment confirmation may mark the order paid.
    pub fn can_mark_paid(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if a shipment may be attached in this status.
    pub fn can_mark_shipped(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    /// Returns true if the order has reached at least the paid stage.
    pub fn is_paid_or_later(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }

    /// Returns true if this is a terminal status (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_only_pending_can_mark_paid() {
        assert!(OrderStatus::Pending.can_mark_paid());
        assert!(!OrderStatus::Paid.can_mark_paid());
        assert!(!OrderStatus::Shipped.can_mark_paid());
        assert!(!OrderStatus::Delivered.can_mark_paid());
        assert!(!OrderStatus::Cancelled.can_mark_paid());
    }

    #[test]
    fn test_only_paid_can_mark_shipped() {
        assert!(!OrderStatus::Pending.can_mark_shipped());
        assert!(OrderStatus::Paid.can_mark_shipped());
        assert!(!OrderStatus::Shipped.can_mark_shipped());
        assert!(!OrderStatus::Delivered.can_mark_shipped());
        assert!(!OrderStatus::Cancelled.can_mark_shipped());
    }

    #[test]
    fn test_paid_or_later() {
        assert!(!OrderStatus::Pending.is_paid_or_later());
        assert!(OrderStatus::Paid.is_paid_or_later());
        assert!(OrderStatus::Shipped.is_paid_or_later());
        assert!(OrderStatus::Delivered.is_paid_or_later());
        assert!(!OrderStatus::Cancelled.is_paid_or_later());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(OrderStatus::Paid.to_string(), "paid");
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_serialization_uses_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
        let back: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(back, OrderStatus::Shipped);
    }
}
