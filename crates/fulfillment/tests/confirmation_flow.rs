//! Integration tests for the payment confirmation pipeline.

use std::sync::Arc;

use common::OrderId;
use domain::{Address, Money, Order, OrderAmounts, OrderItem, OrderStatus};
use fulfillment::{
    CarrierConfig, ConfirmPaymentRequest, FulfillmentError, FulfillmentOrchestrator,
    InMemoryCarrierClient, NotificationChannel, NotificationFanout, RecordingChannel,
    ShipmentProvisioner, SignatureVerifier,
};
use order_store::{InMemoryOrderStore, OrderStore};

const SECRET: &str = "integration-secret";

type TestOrchestrator = FulfillmentOrchestrator<InMemoryOrderStore, InMemoryCarrierClient>;

struct TestHarness {
    orchestrator: TestOrchestrator,
    store: InMemoryOrderStore,
    carrier: InMemoryCarrierClient,
    channels: Vec<RecordingChannel>,
}

impl TestHarness {
    fn new() -> Self {
        let store = InMemoryOrderStore::new();
        let carrier = InMemoryCarrierClient::new();
        let channels = vec![
            RecordingChannel::new("customer-email"),
            RecordingChannel::new("operator-email"),
            RecordingChannel::new("customer-messaging"),
        ];

        let fanout = NotificationFanout::new(
            channels
                .iter()
                .map(|c| Arc::new(c.clone()) as Arc<dyn NotificationChannel>)
                .collect(),
        );

        let orchestrator = FulfillmentOrchestrator::new(
            store.clone(),
            SignatureVerifier::new(SECRET),
            ShipmentProvisioner::new(carrier.clone(), CarrierConfig::default()),
            fanout,
        );

        Self {
            orchestrator,
            store,
            carrier,
            channels,
        }
    }

    async fn seed_order(&self, gateway_ref: &str) -> OrderId {
        let order = Order::new(
            gateway_ref,
            Address {
                recipient_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1-555-0100".to_string(),
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                postal_code: "62701".to_string(),
            },
            vec![
                OrderItem::new("SKU-001", "Widget", Money::from_cents(200), 2),
                OrderItem::new("SKU-002", "Gadget", Money::from_cents(100), 1),
            ],
            OrderAmounts::new(Money::from_cents(500), Money::from_cents(50)),
        )
        .unwrap();
        let order_id = order.id;
        self.store.insert(order).await.unwrap();
        order_id
    }

    fn signed_request(&self, gateway_ref: &str, payment_ref: &str) -> ConfirmPaymentRequest {
        let signature = SignatureVerifier::new(SECRET)
            .sign(gateway_ref, payment_ref)
            .unwrap();
        ConfirmPaymentRequest {
            gateway_order_ref: gateway_ref.to_string(),
            payment_ref: payment_ref.to_string(),
            signature,
        }
    }
}

#[tokio::test]
async fn test_full_confirmation_flow() {
    let h = TestHarness::new();
    let order_id = h.seed_order("gw_1").await;

    let result = h
        .orchestrator
        .confirm_payment(h.signed_request("gw_1", "pay_1"))
        .await
        .unwrap();

    assert_eq!(result.order_id, order_id);
    let tracking_id = result.tracking_id.expect("tracking id assigned");
    assert!(result.tracking_url.unwrap().ends_with(&tracking_id));
    assert!(result.shipment_error.is_none());

    let order = h.store.get(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.tracking_id(), Some(tracking_id.as_str()));

    // Create + allocate, then pickup, all against the carrier.
    assert_eq!(h.carrier.create_call_count(), 1);
    assert_eq!(h.carrier.assign_call_count(), 1);
    assert_eq!(h.carrier.pickup_call_count(), 1);

    // Every channel saw both notices.
    for channel in &h.channels {
        assert_eq!(
            channel.sent_kinds(),
            vec!["order-confirmed", "shipment-dispatched"]
        );
    }
}

#[tokio::test]
async fn test_at_least_once_delivery_is_safe() {
    let h = TestHarness::new();
    let order_id = h.seed_order("gw_1").await;

    let request = h.signed_request("gw_1", "pay_1");
    let first = h.orchestrator.confirm_payment(request.clone()).await.unwrap();
    let second = h.orchestrator.confirm_payment(request.clone()).await.unwrap();
    let third = h.orchestrator.confirm_payment(request).await.unwrap();

    assert_eq!(first.tracking_id, second.tracking_id);
    assert_eq!(second.tracking_id, third.tracking_id);

    // One shipment, ever.
    assert_eq!(h.carrier.create_call_count(), 1);

    let order = h.store.get(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_deferred_shipment_then_out_of_band_retry() {
    let h = TestHarness::new();
    let order_id = h.seed_order("gw_1").await;
    h.carrier.set_fail_on_create(true);

    let deferred = h
        .orchestrator
        .confirm_payment(h.signed_request("gw_1", "pay_1"))
        .await
        .unwrap();
    assert!(deferred.shipment_error.is_some());
    assert_eq!(
        h.store.get(order_id).await.unwrap().status,
        OrderStatus::Paid
    );

    h.carrier.set_fail_on_create(false);
    let retried = h.orchestrator.provision_shipment(order_id).await.unwrap();
    assert!(retried.tracking_id.is_some());
    assert_eq!(
        h.store.get(order_id).await.unwrap().status,
        OrderStatus::Shipped
    );
}

#[tokio::test]
async fn test_rejections_leave_no_trace() {
    let h = TestHarness::new();
    let order_id = h.seed_order("gw_1").await;

    // Tampered signature.
    let mut tampered = h.signed_request("gw_1", "pay_1");
    tampered.signature = h
        .signed_request("gw_1", "pay_other")
        .signature;
    let result = h.orchestrator.confirm_payment(tampered).await;
    assert!(matches!(result, Err(FulfillmentError::InvalidSignature)));

    // Unknown order reference.
    let result = h
        .orchestrator
        .confirm_payment(h.signed_request("gw_missing", "pay_1"))
        .await;
    assert!(matches!(result, Err(FulfillmentError::OrderNotFound(_))));

    // Order untouched, collaborators never called.
    let order = h.store.get(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.shipment.is_none());
    assert_eq!(h.carrier.create_call_count(), 0);
    for channel in &h.channels {
        assert_eq!(channel.sent_count(), 0);
    }
}

#[tokio::test]
async fn test_concurrent_confirmations_create_one_shipment() {
    let h = TestHarness::new();
    let order_id = h.seed_order("gw_1").await;

    let request = h.signed_request("gw_1", "pay_1");
    let (a, b) = tokio::join!(
        h.orchestrator.confirm_payment(request.clone()),
        h.orchestrator.confirm_payment(request),
    );
    let a = a.unwrap();
    let b = b.unwrap();

    let order = h.store.get(order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    // Whatever interleaving happened, the stored tracking id is one of the
    // returned ones and was attached exactly once.
    let stored = order.tracking_id().unwrap().to_string();
    assert!([&a, &b].iter().any(|r| r.tracking_id.as_deref() == Some(stored.as_str())));
}
