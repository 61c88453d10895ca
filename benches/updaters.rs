//! Criterion benchmarks for the chart updaters and dispatch.
//!
//! Measures full re-render cost per control change at several dataset sizes,
//! plus the CSV decode at startup.
//!
//! Run:
//!   cargo bench                  # all benchmarks
//!   cargo bench -- scatter       # just the scatter updater
//!   cargo bench -- csv_decode    # just dataset parsing

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use launch_dashboard::charts::{pie_chart, scatter_chart};
use launch_dashboard::dataset::Dataset;
use launch_dashboard::dispatch::{ControlEvent, ControlState, Dispatcher};
use launch_dashboard::generator::LaunchGenerator;
use launch_dashboard::types::{PayloadRange, SiteSelection};

const SIZES: [usize; 4] = [56, 1_000, 10_000, 100_000];

/// Benchmark: pie updater for All Sites and a single site.
fn bench_pie(c: &mut Criterion) {
    let mut group = c.benchmark_group("pie");
    for size in SIZES {
        let dataset = LaunchGenerator::with_seed(size as u64).generate_dataset(size);
        let site = SiteSelection::Site(dataset.sites()[0].clone());
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("all_sites", size), &dataset, |b, ds| {
            b.iter(|| pie_chart(ds, &SiteSelection::All));
        });
        group.bench_with_input(BenchmarkId::new("one_site", size), &dataset, |b, ds| {
            b.iter(|| pie_chart(ds, &site));
        });
    }
    group.finish();
}

/// Benchmark: scatter updater over a mid-range payload window.
fn bench_scatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter");
    let range = PayloadRange::new(2_000.0, 7_000.0);
    for size in SIZES {
        let dataset = LaunchGenerator::with_seed(size as u64).generate_dataset(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, ds| {
            b.iter(|| scatter_chart(ds, &SiteSelection::All, range));
        });
    }
    group.finish();
}

/// Benchmark: one slider change through the dispatcher, including Plotly JSON.
fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.measurement_time(Duration::from_secs(5));
    for size in [56, 10_000] {
        let dataset = Arc::new(LaunchGenerator::with_seed(1).generate_dataset(size));
        let dispatcher = Dispatcher::new(dataset.clone());
        group.bench_function(BenchmarkId::new("slider_change", size), |b| {
            let mut state = ControlState::initial(&dataset);
            let mut low = 0.0;
            b.iter(|| {
                low = (low + 1_000.0) % 10_000.0;
                let event = ControlEvent::PayloadChanged(PayloadRange::new(low, 10_000.0));
                dispatcher
                    .apply(&mut state, event)
                    .iter()
                    .map(|u| u.figure.to_plotly())
                    .count()
            });
        });
    }
    group.finish();
}

/// Benchmark: CSV decode of a generated dataset.
fn bench_csv_decode(c: &mut Criterion) {
    let mut csv = String::from("Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category\n");
    for r in LaunchGenerator::with_seed(2).generate_launches(10_000) {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.flight_number.unwrap_or_default(),
            r.launch_site,
            r.outcome.class(),
            r.payload_mass_kg,
            r.booster_version.unwrap_or_default(),
            r.booster_category
        ));
    }

    let mut group = c.benchmark_group("csv_decode");
    group.throughput(Throughput::Bytes(csv.len() as u64));
    group.bench_function("10k_rows", |b| {
        b.iter(|| Dataset::from_csv_bytes(csv.as_bytes()).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_pie, bench_scatter, bench_dispatch, bench_csv_decode);
criterion_main!(benches);
