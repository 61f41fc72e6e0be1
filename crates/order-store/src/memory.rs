use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::OrderId;
use domain::{Order, OrderStatus, ShipmentInfo};
use tokio::sync::RwLock;

use crate::{OrderStoreError, Result, store::OrderStore};

/// In-memory order store implementation.
///
/// Used in tests and local runs; provides the same conditional-update
/// semantics as the PostgreSQL implementation. All conditional checks
/// happen under a single write lock, so they are atomic with the write.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;

        if orders
            .values()
            .any(|o| o.gateway_order_ref == order.gateway_order_ref)
        {
            return Err(OrderStoreError::DuplicateGatewayRef(
                order.gateway_order_ref.clone(),
            ));
        }

        orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Order> {
        let orders = self.orders.read().await;
        orders
            .get(&order_id)
            .cloned()
            .ok_or(OrderStoreError::NotFound(order_id))
    }

    async fn find_by_gateway_ref(&self, gateway_ref: &str) -> Result<Order> {
        let orders = self.orders.read().await;
        orders
            .values()
            .find(|o| o.gateway_order_ref == gateway_ref)
            .cloned()
            .ok_or_else(|| OrderStoreError::GatewayRefNotFound(gateway_ref.to_string()))
    }

    async fn update_status(
        &self,
        order_id: OrderId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::NotFound(order_id))?;

        if !from.contains(&order.status) {
            return Err(OrderStoreError::StatusConflict {
                order_id,
                current: order.status,
            });
        }

        order.status = to;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn attach_shipment(&self, order_id: OrderId, shipment: ShipmentInfo) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::NotFound(order_id))?;

        if order.has_shipment() {
            return Err(OrderStoreError::ShipmentAlreadyAttached(order_id));
        }
        if !order.status.can_mark_shipped() {
            return Err(OrderStoreError::StatusConflict {
                order_id,
                current: order.status,
            });
        }

        order.shipment = Some(shipment);
        order.status = OrderStatus::Shipped;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}
