use criterion::{Criterion, criterion_group, criterion_main};
use fulfillment::SignatureVerifier;

fn bench_verify_valid(c: &mut Criterion) {
    let verifier = SignatureVerifier::new("bench-secret");
    let signature = verifier.sign("gw_bench", "pay_bench").unwrap();

    c.bench_function("signature/verify_valid", |b| {
        b.iter(|| verifier.verify("gw_bench", "pay_bench", &signature).unwrap());
    });
}

fn bench_verify_mismatch(c: &mut Criterion) {
    let verifier = SignatureVerifier::new("bench-secret");
    let signature = verifier.sign("gw_bench", "pay_other").unwrap();

    c.bench_function("signature/verify_mismatch", |b| {
        b.iter(|| verifier.verify("gw_bench", "pay_bench", &signature).unwrap());
    });
}

criterion_group!(benches, bench_verify_valid, bench_verify_mismatch);
criterion_main!(benches);
