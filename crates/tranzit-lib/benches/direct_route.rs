use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;
use tranzit_lib::{plan_direct_route, DirectRouteFinder, DirectRouteRequest, TransitSnapshot};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/tranzy_snapshot.json")
}

static SNAPSHOT: Lazy<TransitSnapshot> =
    Lazy::new(|| TransitSnapshot::load(&fixture_path()).expect("fixture loads"));
static SHORT_REQUEST: Lazy<DirectRouteRequest> =
    Lazy::new(|| DirectRouteRequest::new("4587", "4611", "1"));
static RETURN_REQUEST: Lazy<DirectRouteRequest> =
    Lazy::new(|| DirectRouteRequest::new("4611", "4587", "1"));
static MISS_REQUEST: Lazy<DirectRouteRequest> =
    Lazy::new(|| DirectRouteRequest::new("4587", "9001", "1"));

fn benchmark_direct_route(c: &mut Criterion) {
    let snapshot = &*SNAPSHOT;
    let finder = DirectRouteFinder::default();

    c.bench_function("direct_first_trip", |b| {
        let request = &*SHORT_REQUEST;
        b.iter(|| {
            let plan = plan_direct_route(snapshot, request, &finder).expect("route exists");
            black_box(plan.point_count())
        });
    });

    c.bench_function("direct_second_trip", |b| {
        let request = &*RETURN_REQUEST;
        b.iter(|| {
            let plan = plan_direct_route(snapshot, request, &finder).expect("route exists");
            black_box(plan.point_count())
        });
    });

    c.bench_function("direct_exhaustive_miss", |b| {
        let request = &*MISS_REQUEST;
        b.iter(|| black_box(plan_direct_route(snapshot, request, &finder).is_err()));
    });
}

criterion_group!(benches, benchmark_direct_route);
criterion_main!(benches);
