//! FILENAME: report-engine/benches/tabulate.rs
//! Benchmark for the tabulation hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use report_engine::{tabulate, Aggregation, FlatRecord, RowOrdering, TableDefinition};

fn bucket_label(month: usize) -> String {
    format!("2025-{:02}", month + 1)
}

fn create_records(teams: usize, regions: usize, months: usize) -> Vec<FlatRecord> {
    let mut records = Vec::with_capacity(teams * regions * months);
    for team in 0..teams {
        for region in 0..regions {
            for month in 0..months {
                let mut record = FlatRecord::default();
                record.insert("team".to_string(), format!("T{team:02}"));
                record.insert("region".to_string(), format!("R{region:02}"));
                record.insert("date".to_string(), bucket_label(month));
                record.insert(
                    "cost".to_string(),
                    format!("{}", (team * 31 + region * 7 + month) % 997),
                );
                records.push(record);
            }
        }
    }
    records
}

fn bench_tabulate(c: &mut Criterion) {
    let definition = TableDefinition {
        category_columns: vec!["team".to_string(), "region".to_string()],
        time_buckets: (0..12).map(bucket_label).collect(),
        time_column: "date".to_string(),
        value_column: "cost".to_string(),
        placeholder: "0.00".to_string(),
        aggregation: Aggregation::Sum,
        ordering: RowOrdering::LatestValueDescending,
    };

    let small = create_records(5, 4, 12);
    let large = create_records(40, 25, 12);

    c.bench_function("tabulate_small", |b| {
        b.iter(|| tabulate(black_box(&definition), black_box(&small)).unwrap())
    });
    c.bench_function("tabulate_large", |b| {
        b.iter(|| tabulate(black_box(&definition), black_box(&large)).unwrap())
    });
}

criterion_group!(benches, bench_tabulate);
criterion_main!(benches);
