//! The order record.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

use super::{Address, OrderAmounts, OrderItem, OrderStatus, ShipmentInfo};

/// A single checkout transaction with items, address, amounts, and
/// lifecycle status.
///
/// Orders are created `Pending` by the checkout flow. The fulfillment
/// pipeline advances them to `Paid` and `Shipped`; delivery and
/// cancellation are recorded by other processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier, assigned at creation.
    pub id: OrderId,

    /// External payment-gateway order reference, unique per order.
    /// Used to locate the order during payment confirmation.
    pub gateway_order_ref: String,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Monetary breakdown.
    pub amounts: OrderAmounts,

    /// Recipient address.
    pub address: Address,

    /// Ordered items, immutable once the order is created.
    pub items: Vec<OrderItem>,

    /// Carrier shipment data, absent until a shipment is provisioned.
    pub shipment: Option<ShipmentInfo>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order, validating its invariants.
    pub fn new(
        gateway_order_ref: impl Into<String>,
        address: Address,
        items: Vec<OrderItem>,
        amounts: OrderAmounts,
    ) -> Result<Self, OrderError> {
        let gateway_order_ref = gateway_order_ref.into();
        if gateway_order_ref.is_empty() {
            return Err(OrderError::EmptyGatewayRef);
        }
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: item.product_id.to_string(),
                });
            }
            if item.unit_price.is_negative() {
                return Err(OrderError::InvalidPrice {
                    product_id: item.product_id.to_string(),
                });
            }
        }
        if !amounts.is_consistent() {
            return Err(OrderError::InvalidAmounts {
                reason: "amounts must be non-negative and total must equal subtotal + shipping"
                    .to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            gateway_order_ref,
            status: OrderStatus::Pending,
            amounts,
            address,
            items,
            shipment: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the tracking id if a shipment has been provisioned.
    pub fn tracking_id(&self) -> Option<&str> {
        self.shipment
            .as_ref()
            .map(|s| s.tracking_id.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Returns true if a shipment with a non-empty tracking id is attached.
    pub fn has_shipment(&self) -> bool {
        self.tracking_id().is_some()
    }

    /// Returns the number of item lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Money;

    fn test_address() -> Address {
        Address {
            recipient_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1-555-0100".to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
        }
    }

    fn test_items() -> Vec<OrderItem> {
        vec![
            OrderItem::new("SKU-001", "Widget", Money::from_cents(200), 2),
            OrderItem::new("SKU-002", "Gadget", Money::from_cents(100), 1),
        ]
    }

    #[test]
    fn test_new_order_is_pending_without_shipment() {
        let order = Order::new(
            "gw_1",
            test_address(),
            test_items(),
            OrderAmounts::new(Money::from_cents(500), Money::from_cents(50)),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.shipment.is_none());
        assert!(!order.has_shipment());
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.amounts.total.cents(), 550);
    }

    #[test]
    fn test_empty_gateway_ref_rejected() {
        let result = Order::new(
            "",
            test_address(),
            test_items(),
            OrderAmounts::new(Money::from_cents(500), Money::zero()),
        );
        assert_eq!(result.unwrap_err(), OrderError::EmptyGatewayRef);
    }

    #[test]
    fn test_order_without_items_rejected() {
        let result = Order::new(
            "gw_1",
            test_address(),
            vec![],
            OrderAmounts::new(Money::zero(), Money::zero()),
        );
        assert_eq!(result.unwrap_err(), OrderError::NoItems);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let items = vec![OrderItem::new("SKU-001", "Widget", Money::from_cents(200), 0)];
        let result = Order::new(
            "gw_1",
            test_address(),
            items,
            OrderAmounts::new(Money::zero(), Money::zero()),
        );
        assert!(matches!(result, Err(OrderError::InvalidQuantity { .. })));
    }

    #[test]
    fn test_negative_price_rejected() {
        let items = vec![OrderItem::new("SKU-001", "Widget", Money::from_cents(-1), 1)];
        let result = Order::new(
            "gw_1",
            test_address(),
            items,
            OrderAmounts::new(Money::zero(), Money::zero()),
        );
        assert!(matches!(result, Err(OrderError::InvalidPrice { .. })));
    }

    #[test]
    fn test_inconsistent_amounts_rejected() {
        let amounts = OrderAmounts {
            subtotal: Money::from_cents(500),
            shipping: Money::from_cents(50),
            total: Money::from_cents(9999),
        };
        let result = Order::new("gw_1", test_address(), test_items(), amounts);
        assert!(matches!(result, Err(OrderError::InvalidAmounts { .. })));
    }

    #[test]
    fn test_empty_tracking_id_is_not_a_shipment() {
        let mut order = Order::new(
            "gw_1",
            test_address(),
            test_items(),
            OrderAmounts::new(Money::from_cents(500), Money::zero()),
        )
        .unwrap();

        order.shipment = Some(ShipmentInfo {
            tracking_id: String::new(),
            tracking_url: String::new(),
            courier_name: String::new(),
        });
        assert!(!order.has_shipment());
        assert_eq!(order.tracking_id(), None);
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = Order::new(
            "gw_1",
            test_address(),
            test_items(),
            OrderAmounts::new(Money::from_cents(500), Money::from_cents(50)),
        )
        .unwrap();

        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
