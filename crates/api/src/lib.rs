//! HTTP API server for the storefront fulfillment pipeline.
//!
//! Exposes the payment confirmation webhook, order lookup, and the
//! standalone shipment retry endpoint, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use fulfillment::{
    CarrierClient, CarrierConfig, FulfillmentOrchestrator, InMemoryCarrierClient,
    NotificationChannel, NotificationFanout, RecordingChannel, ShipmentProvisioner,
    SignatureVerifier,
};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore, C: CarrierClient> {
    pub store: S,
    pub orchestrator: FulfillmentOrchestrator<S, C>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, C>(state: Arc<AppState<S, C>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderStore + Clone + 'static,
    C: CarrierClient + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/payments/confirm", post(routes::payments::confirm::<S, C>))
        .route("/orders", post(routes::orders::create::<S, C>))
        .route("/orders/{id}", get(routes::orders::get::<S, C>))
        .route(
            "/orders/{id}/shipment",
            post(routes::orders::provision_shipment::<S, C>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given store, wiring the in-memory
/// carrier client and the default notification channels.
pub fn create_default_state<S>(
    store: S,
    config: &Config,
) -> Arc<AppState<S, InMemoryCarrierClient>>
where
    S: OrderStore + Clone + 'static,
{
    let carrier = InMemoryCarrierClient::new();
    carrier.set_tracking_on_create(true);

    let fanout = NotificationFanout::new(vec![
        Arc::new(RecordingChannel::new("customer-email")) as Arc<dyn NotificationChannel>,
        Arc::new(RecordingChannel::new("operator-email")),
        Arc::new(RecordingChannel::new("customer-messaging")),
    ]);

    let orchestrator = FulfillmentOrchestrator::new(
        store.clone(),
        SignatureVerifier::new(config.webhook_secret.clone()),
        ShipmentProvisioner::new(carrier, CarrierConfig::default()),
        fanout,
    );

    Arc::new(AppState {
        store,
        orchestrator,
    })
}
