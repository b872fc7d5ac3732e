use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use contrast::similarity::similarity_of;
use contrast::{Dashboard, DashboardConfig, DataSnapshot, Row};

/// Synthetic snapshot with `size` entities, 12 features, 8 scales and 64 dimensions
fn snapshot(size: usize) -> DataSnapshot {
    let mut entities = Vec::with_capacity(size);
    let mut rollup = Vec::with_capacity(size);
    let mut contrast = Vec::with_capacity(size);
    let mut raw = Vec::with_capacity(size);

    for i in 0..size {
        let id = i as i64 + 1;
        let name = format!("Entity{}", i);
        entities.push(
            Row::new()
                .with("EntID", id)
                .with("Entity Name", name.clone())
                .with("ModelGroup", "Primary")
                .with("Entity Type", format!("Type{}", i % 5)),
        );

        let mut r = Row::new().with("EntID", id).with("Entity Name", name.clone());
        for f in 0..12 {
            r.insert(format!("Feature{}", f), ((i * 7 + f * 3) % 100) as f64 / 100.0);
        }
        rollup.push(r);

        let mut c = Row::new().with("EntID", id).with("Entity Name", name);
        for s in 0..8 {
            c.insert(format!("Left{} to Right{}", s, s), ((i * 11 + s) % 100) as f64 / 100.0);
        }
        contrast.push(c);

        let mut d = Row::new().with("EntID", id);
        for k in 0..64 {
            d.insert(format!("Dim{}", k), ((i * 13 + k * 5) % 41) as f64 - 20.0);
        }
        raw.push(d);
    }

    DataSnapshot::from_rows(entities, rollup, contrast, raw)
}

/// Benchmark the similarity metric over plain vectors
fn bench_similarity_metric(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_metric");

    for size in [16, 256, 4096].iter() {
        let a: Vec<f64> = (0..*size).map(|i| (i % 17) as f64 - 8.0).collect();
        let b: Vec<f64> = (0..*size).map(|i| (i % 13) as f64 - 6.0).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |bench, _| {
            bench.iter(|| criterion::black_box(similarity_of(&a, &b)));
        });
    }
    group.finish();
}

/// Benchmark building catalog and indexes for a snapshot
fn bench_dashboard_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_build");

    for size in [100, 1000, 10_000].iter() {
        let snapshot = std::sync::Arc::new(snapshot(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let dashboard = Dashboard::new(snapshot.clone(), DashboardConfig::default());
                criterion::black_box(dashboard.catalog().len());
            });
        });
    }
    group.finish();
}

/// Benchmark a full selection change: similarity, radar and continuum
fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");

    for size in [100, 1000, 10_000].iter() {
        let dashboard = Dashboard::new(snapshot(*size), DashboardConfig::default());
        let first = "Entity0".to_string();
        let second = format!("Entity{}", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| criterion::black_box(dashboard.compare(&first, &second)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_similarity_metric,
    bench_dashboard_build,
    bench_compare
);
criterion_main!(benches);
