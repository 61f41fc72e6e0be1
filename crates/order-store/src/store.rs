use async_trait::async_trait;
use common::OrderId;
use domain::{Order, OrderStatus, ShipmentInfo};

use crate::Result;

/// Core trait for order store implementations.
///
/// The store owns the order state machine's write path: status transitions
/// and shipment attachment are compare-and-swap updates that either observe
/// the expected current state or fail with a conflict. This is what makes
/// at-least-once delivery of payment confirmations safe without in-process
/// locks.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order.
    ///
    /// Fails with `DuplicateGatewayRef` if an order with the same gateway
    /// order reference already exists.
    async fn insert(&self, order: Order) -> Result<()>;

    /// Loads an order by ID.
    async fn get(&self, order_id: OrderId) -> Result<Order>;

    /// Looks up the order correlated to a payment-gateway order reference.
    ///
    /// Fails closed: an unknown reference is `GatewayRefNotFound`, never a
    /// newly created order.
    async fn find_by_gateway_ref(&self, gateway_ref: &str) -> Result<Order>;

    /// Conditionally transitions an order's status.
    ///
    /// Succeeds only when the current status is in `from`; otherwise fails
    /// with `StatusConflict` carrying the observed status. The check and
    /// write are atomic relative to concurrent updates of the same order.
    ///
    /// Returns the updated order.
    async fn update_status(
        &self,
        order_id: OrderId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<Order>;

    /// Conditionally attaches a shipment and marks the order shipped.
    ///
    /// Succeeds only when the order is `Paid` and carries no tracking id
    /// yet; the shipment write and the `Paid → Shipped` transition are a
    /// single atomic update. An existing tracking id fails with
    /// `ShipmentAlreadyAttached` and is never overwritten.
    ///
    /// Returns the updated order.
    async fn attach_shipment(&self, order_id: OrderId, shipment: ShipmentInfo) -> Result<Order>;
}
