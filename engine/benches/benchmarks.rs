//! Performance benchmarks for till-engine

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use till_engine::{group_by_date, render_csv, Inventory, Ledger, Pesos, PriceTier};

fn populated_ledger(sales: usize) -> Ledger {
    let mut ledger = Ledger::from_parts(
        Inventory::with_counts(u32::MAX / 2, u32::MAX / 2),
        Vec::new(),
    );
    for i in 0..sales {
        let tier = if i % 2 == 0 { PriceTier::P69 } else { PriceTier::P99 };
        let at = Utc
            .with_ymd_and_hms(2025, 1, 1 + (i % 28) as u32, 12, 0, 0)
            .unwrap();
        ledger
            .record_sale(format!("sale_{}", i), tier, 2, Pesos::from_pesos(500), at)
            .unwrap();
    }
    ledger
}

fn bench_ledger_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_operations");

    group.bench_function("record_sale", |b| {
        let mut ledger = Ledger::from_parts(
            Inventory::with_counts(u32::MAX / 2, u32::MAX / 2),
            Vec::new(),
        );
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 21, 0, 0).unwrap();
        let mut id = 0u64;

        b.iter(|| {
            id += 1;
            ledger.record_sale(
                format!("sale_{}", id),
                black_box(PriceTier::P69),
                black_box(2),
                black_box(Pesos::from_pesos(150)),
                now,
            )
        })
    });

    for size in [100usize, 1_000, 10_000] {
        let ledger = populated_ledger(size);

        group.bench_with_input(
            BenchmarkId::new("group_by_date", size),
            &ledger,
            |b, ledger| b.iter(|| group_by_date(black_box(ledger.sales()))),
        );

        group.bench_with_input(
            BenchmarkId::new("render_csv", size),
            &ledger,
            |b, ledger| b.iter(|| render_csv(black_box(ledger.sales()))),
        );

        group.bench_with_input(
            BenchmarkId::new("snapshot_to_json", size),
            &ledger,
            |b, ledger| b.iter(|| ledger.snapshot().to_json().unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ledger_operations);
criterion_main!(benches);
