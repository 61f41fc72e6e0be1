use async_trait::async_trait;
use common::OrderId;
use domain::{Money, Order, OrderAmounts, OrderStatus, ShipmentInfo};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{OrderStoreError, Result, store::OrderStore};

/// PostgreSQL-backed order store implementation.
///
/// Conditional updates are expressed as guarded `UPDATE ... WHERE`
/// statements, so the status check and the write are one atomic statement
/// on the database side.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let address = serde_json::from_value(row.try_get("address")?)?;
        let items = serde_json::from_value(row.try_get("items")?)?;
        let shipment: Option<ShipmentInfo> = match row.try_get::<Option<serde_json::Value>, _>("shipment")? {
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            gateway_order_ref: row.try_get("gateway_order_ref")?,
            status: parse_status(row.try_get("status")?)?,
            amounts: OrderAmounts {
                subtotal: Money::from_cents(row.try_get("subtotal_cents")?),
                shipping: Money::from_cents(row.try_get("shipping_cents")?),
                total: Money::from_cents(row.try_get("total_cents")?),
            },
            address,
            items,
            shipment,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn parse_status(s: String) -> Result<OrderStatus> {
    serde_json::from_value(serde_json::Value::String(s)).map_err(OrderStoreError::from)
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert(&self, order: Order) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders
                (id, gateway_order_ref, status, subtotal_cents, shipping_cents,
                 total_cents, address, items, shipment, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(&order.gateway_order_ref)
        .bind(order.status.as_str())
        .bind(order.amounts.subtotal.cents())
        .bind(order.amounts.shipping.cents())
        .bind(order.amounts.total.cents())
        .bind(serde_json::to_value(&order.address)?)
        .bind(serde_json::to_value(&order.items)?)
        .bind(
            order
                .shipment
                .as_ref()
                .map(serde_json::to_value)
                .transpose()?,
        )
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let Some(db_err) = e.as_database_error()
                    && db_err.is_unique_violation()
                {
                    return Err(OrderStoreError::DuplicateGatewayRef(
                        order.gateway_order_ref.clone(),
                    ));
                }
                Err(e.into())
            }
        }
    }

    async fn get(&self, order_id: OrderId) -> Result<Order> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(OrderStoreError::NotFound(order_id))?;

        Self::row_to_order(row)
    }

    async fn find_by_gateway_ref(&self, gateway_ref: &str) -> Result<Order> {
        let row = sqlx::query("SELECT * FROM orders WHERE gateway_order_ref = $1")
            .bind(gateway_ref)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| OrderStoreError::GatewayRefNotFound(gateway_ref.to_string()))?;

        Self::row_to_order(row)
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(
        &self,
        order_id: OrderId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<Order> {
        let from_strs: Vec<String> = from.iter().map(|s| s.as_str().to_string()).collect();

        let row = sqlx::query(
            r#"
            UPDATE orders
            SET status = $2, updated_at = now()
            WHERE id = $1 AND status = ANY($3)
            RETURNING *
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(to.as_str())
        .bind(&from_strs)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_order(row),
            // Zero rows: either the order is missing or its status fell
            // outside the expected set. Classify with a follow-up read.
            None => {
                let current = self.get(order_id).await?;
                Err(OrderStoreError::StatusConflict {
                    order_id,
                    current: current.status,
                })
            }
        }
    }

    #[tracing::instrument(skip(self, shipment), fields(tracking_id = %shipment.tracking_id))]
    async fn attach_shipment(&self, order_id: OrderId, shipment: ShipmentInfo) -> Result<Order> {
        let row = sqlx::query(
            r#"
            UPDATE orders
            SET shipment = $2, status = 'shipped', updated_at = now()
            WHERE id = $1
              AND status = 'paid'
              AND COALESCE(shipment->>'tracking_id', '') = ''
            RETURNING *
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(serde_json::to_value(&shipment)?)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_order(row),
            None => {
                let current = self.get(order_id).await?;
                if current.has_shipment() {
                    Err(OrderStoreError::ShipmentAlreadyAttached(order_id))
                } else {
                    Err(OrderStoreError::StatusConflict {
                        order_id,
                        current: current.status,
                    })
                }
            }
        }
    }
}
