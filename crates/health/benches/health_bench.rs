use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use health::{InMemoryChecker, Readiness, ServiceName};

fn bench_liveness_check(c: &mut Criterion) {
    c.bench_function("health/check", |b| {
        b.iter(|| std::hint::black_box(health::check()));
    });

    c.bench_function("health/check_to_json", |b| {
        b.iter(|| serde_json::to_vec(&health::check()).unwrap());
    });
}

fn bench_readiness(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let readiness = (0..10).fold(Readiness::new(ServiceName::gateway()), |r, i| {
        r.with_checker(Arc::new(InMemoryChecker::new(format!("dep-{i}"))))
    });

    c.bench_function("health/readiness_10_checkers", |b| {
        b.iter(|| rt.block_on(readiness.evaluate()));
    });
}

criterion_group!(benches, bench_liveness_check, bench_readiness);
criterion_main!(benches);
