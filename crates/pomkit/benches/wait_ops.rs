//! Wait and Query Benchmarks
//!
//! Benchmarks for the wait fast path, polled waits in virtual time, and
//! query rendering over trees of increasing size.
//!
//! Run with: `cargo bench --bench wait_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pomkit::mock::{MockDriver, MockNode};
use pomkit::prelude::*;
use pomkit::{wait_for_existence, ManualClock};
use std::time::Duration;

fn app_with_buttons(count: usize) -> (App<MockDriver>, ManualClock) {
    let clock = ManualClock::new();
    let driver = MockDriver::new(clock.clone());
    let window = driver.add(MockDriver::ROOT, MockNode::window());
    for i in 0..count {
        driver.add(window, MockNode::button(format!("button-{i}")));
    }
    let app = App::with_clock(driver, PomConfig::default(), clock.clone()).unwrap();
    (app, clock)
}

fn bench_fast_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("wait_fast_path");

    for size in [1_usize, 10, 100] {
        let (app, _) = app_with_buttons(size);
        let last = format!("button-{}", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &last, |bench, id| {
            bench.iter(|| {
                let element = app.descendants(ElementType::Button).get(id.as_str());
                black_box(wait_for_existence(element, Duration::from_secs(10), true).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_polled_timeout(c: &mut Criterion) {
    let mut group = c.benchmark_group("wait_polled_timeout");

    for timeout_ms in [100_u64, 1_000, 10_000] {
        let (app, _) = app_with_buttons(10);
        group.bench_with_input(
            BenchmarkId::from_parameter(timeout_ms),
            &timeout_ms,
            |bench, &ms| {
                bench.iter(|| {
                    let element = app.descendants(ElementType::Button).get("missing");
                    let result = wait_for_existence(element, Duration::from_millis(ms), true);
                    black_box(result.is_err());
                });
            },
        );
    }

    group.finish();
}

fn bench_query_rendering(c: &mut Criterion) {
    let (app, _) = app_with_buttons(1);
    let element = app
        .descendants(ElementType::Stepper)
        .get("quantity")
        .buttons()
        .element_bound_by(1);

    c.bench_function("query_display", |bench| {
        bench.iter(|| black_box(element.query().to_string()));
    });
}

fn bench_counts(c: &mut Criterion) {
    let page = BasePage::new(app_with_buttons(100).0);

    c.bench_function("button_count_100", |bench| {
        bench.iter(|| black_box(page.button_count(black_box("button-7"))));
    });
}

criterion_group!(
    benches,
    bench_fast_path,
    bench_polled_timeout,
    bench_query_rendering,
    bench_counts
);
criterion_main!(benches);
