use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{DateTime, Duration, Utc};
use carestock_core::{ItemId, TenantId};
use carestock_forecast::{
    AlertAggregator, ForecastPolicy, ReplenishmentPlanner, StockPrediction, average_daily_consumption, forecast,
};
use carestock_inventory::{Category, ConsumptionRecord, InventoryItem, School};

fn history(tenant_id: TenantId, item_id: ItemId, n: usize, now: DateTime<Utc>) -> Vec<ConsumptionRecord> {
    (0..n)
        .map(|i| {
            let age = Duration::hours((i as i64 * 7) % (30 * 24));
            ConsumptionRecord::delivered(tenant_id, item_id, (i % 13) as u32 + 1, now - age)
        })
        .collect()
}

fn bench_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimation");
    let now = Utc::now();
    let tenant_id = TenantId::new();
    let item_id = ItemId::new();

    for n in [10usize, 100, 1_000, 10_000] {
        let records = history(tenant_id, item_id, n, now);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| average_daily_consumption(black_box(records), 30, now))
        });
    }
    group.finish();
}

fn bench_forecast_and_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");
    let policy = ForecastPolicy::canonical();
    let planner = ReplenishmentPlanner::from_policy(&policy);

    group.bench_function("classify_and_plan", |b| {
        b.iter(|| {
            let f = forecast(black_box(137), black_box(12.0), Category::DignityCritical, &policy);
            let order = planner.recommended_order(black_box(12.0), black_box(137));
            (f, order)
        })
    });
    group.finish();
}

fn bench_alert_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("alerts");
    let policy = ForecastPolicy::canonical();
    let school = School::new("bench");
    let now = Utc::now();
    let aggregator = AlertAggregator::new(policy.re_alert_interval());

    for n in [50usize, 500, 5_000] {
        let predictions: Vec<StockPrediction> = (0..n)
            .map(|i| {
                let category = Category::ALL[i % Category::ALL.len()];
                let item = InventoryItem::new(school.id, format!("item-{i}"), category, (i % 40) as u32, "unit");
                StockPrediction::compute(&item, 3.0, &policy, now).expect("canonical policy covers all categories")
            })
            .collect();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &predictions, |b, predictions| {
            b.iter(|| aggregator.snapshot(&school, black_box(predictions), now))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_estimation,
    bench_forecast_and_plan,
    bench_alert_aggregation
);
criterion_main!(benches);
