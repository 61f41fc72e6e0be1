use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Address, Money, Order, OrderAmounts, OrderItem};

fn make_address() -> Address {
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

fn bench_order_construction(c: &mut Criterion) {
    c.bench_function("domain/order_new_with_validation", |b| {
        b.iter(|| {
            let items = vec![
                OrderItem::new("SKU-001", "Widget", Money::from_cents(200), 2),
                OrderItem::new("SKU-002", "Gadget", Money::from_cents(100), 1),
            ];
            Order::new(
                "gw_bench",
                make_address(),
                items,
                OrderAmounts::new(Money::from_cents(500), Money::from_cents(50)),
            )
            .unwrap()
        });
    });
}

fn bench_order_serialization(c: &mut Criterion) {
    let order = Order::new(
        "gw_bench",
        make_address(),
        vec![OrderItem::new("SKU-001", "Widget", Money::from_cents(200), 2)],
        OrderAmounts::new(Money::from_cents(400), Money::from_cents(50)),
    )
    .unwrap();

    c.bench_function("domain/order_json_roundtrip", |b| {
        b.iter(|| {
            let json = serde_json::to_string(&order).unwrap();
            let back: Order = serde_json::from_str(&json).unwrap();
            back
        });
    });
}

criterion_group!(benches, bench_order_construction, bench_order_serialization);
criterion_main!(benches);
