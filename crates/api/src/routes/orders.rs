//! Order endpoints: checkout glue, lookup, and shipment retry.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::OrderId;
use domain::{Address, Money, Order, OrderAmounts, OrderItem, ShipmentInfo};
use fulfillment::{CarrierClient, PaymentConfirmation};
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub gateway_order_ref: String,
    pub address: Address,
    pub items: Vec<OrderItemRequest>,
    pub shipping_cents: i64,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub order_id: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub gateway_order_ref: String,
    pub status: String,
    pub subtotal_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub items: Vec<OrderItemResponse>,
    pub shipment: Option<ShipmentInfo>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.to_string(),
            gateway_order_ref: order.gateway_order_ref,
            status: order.status.to_string(),
            subtotal_cents: order.amounts.subtotal.cents(),
            shipping_cents: order.amounts.shipping.cents(),
            total_cents: order.amounts.total.cents(),
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    name: item.name,
                    unit_price_cents: item.unit_price.cents(),
                    quantity: item.quantity,
                })
                .collect(),
            shipment: order.shipment,
        }
    }
}

// -- Handlers --

/// POST /orders — create a pending order (thin checkout glue).
#[tracing::instrument(skip(state, req), fields(gateway_order_ref = %req.gateway_order_ref))]
pub async fn create<S, C>(
    State(state): State<Arc<AppState<S, C>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderCreatedResponse>), ApiError>
where
    S: OrderStore + Clone + 'static,
    C: CarrierClient + 'static,
{
    let items: Vec<OrderItem> = req
        .items
        .iter()
        .map(|item| {
            OrderItem::new(
                item.product_id.as_str(),
                item.name.as_str(),
                Money::from_cents(item.unit_price_cents),
                item.quantity,
            )
        })
        .collect();

    let subtotal = items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.total_price());
    let amounts = OrderAmounts::new(subtotal, Money::from_cents(req.shipping_cents));

    let order = Order::new(req.gateway_order_ref, req.address, items, amounts)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let order_id = order.id;
    let status = order.status;

    state.store.insert(order).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(OrderCreatedResponse {
            order_id: order_id.to_string(),
            status: status.to_string(),
        }),
    ))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S, C>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: OrderStore + Clone + 'static,
    C: CarrierClient + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state.store.get(order_id).await?;
    Ok(Json(order.into()))
}

/// POST /orders/:id/shipment — provision (or retry) the order's shipment.
#[tracing::instrument(skip(state))]
pub async fn provision_shipment<S, C>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentConfirmation>, ApiError>
where
    S: OrderStore + Clone + 'static,
    C: CarrierClient + 'static,
{
    let order_id = parse_order_id(&id)?;
    let confirmation = state.orchestrator.provision_shipment(order_id).await?;
    Ok(Json(confirmation))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::from(uuid))
}
