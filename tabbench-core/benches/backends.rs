// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Backend microbenchmarks.
//!
//! Criterion counterpart of a `tabbench run`: the same read-then-write
//! cycle per built-in backend, at a few dataset sizes.

use std::path::Path;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabbench_core::{BackendRegistry, Meter, ReadOptions};
use tempfile::TempDir;

/// Row counts to benchmark.
const ROW_COUNTS: &[usize] = &[100, 1_000, 10_000];

fn write_dataset(path: &Path, rows: usize) -> u64 {
    let mut body = String::from("gender,race/ethnicity,lunch,math score,reading score\n");
    for i in 0..rows {
        body.push_str(&format!(
            "{},group {},standard,{},{}\n",
            if i % 2 == 0 { "female" } else { "male" },
            (b'A' + (i % 5) as u8) as char,
            i % 100,
            (i * 7) % 100
        ));
    }
    std::fs::write(path, &body).expect("Failed to write dataset");
    body.len() as u64
}

/// Benchmark one full trial per backend.
fn bench_read_write(c: &mut Criterion) {
    let registry = BackendRegistry::with_builtin();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let options = ReadOptions::default();
    let mut meter = Meter::new();

    let mut group = c.benchmark_group("read_write");
    group.measurement_time(Duration::from_secs(5));

    for &rows in ROW_COUNTS {
        let source = dir.path().join(format!("in_{}.csv", rows));
        let bytes = write_dataset(&source, rows);
        group.throughput(Throughput::Bytes(bytes));

        for entry in registry.iter() {
            let dest = dir.path().join(format!("out_{}_{}.csv", entry.id, rows));
            group.bench_with_input(BenchmarkId::new(entry.id.as_str(), rows), &rows, |b, _| {
                b.iter(|| {
                    black_box(
                        entry
                            .workload
                            .read_write(&mut meter, &source, &dest, &options)
                            .ok(),
                    );
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_read_write);
criterion_main!(benches);
