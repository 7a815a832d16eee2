// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Lazy backend: scan first, materialize on collect.
//!
//! `scan` only opens the file and sniffs the header, producing a
//! [`ScanPlan`]. Rows are read when the plan is collected into a
//! [`PartitionedFrame`]. The timed read covers both phases: elapsed times are
//! summed, memory takes the larger of the two figures since it is a level
//! rather than a cost.
//!
//! `write` ignores the requested encoding and always emits UTF-8.

use std::path::{Path, PathBuf};

use super::{create_writer, decode_record, finish_writer, open_reader};
use crate::backend::{Backend, ReadOptions};
use crate::error::{BackendError, BackendResult};
use crate::measure::{Measured, Meter};
use crate::types::TextEncoding;

/// Default number of rows per materialized partition.
pub const DEFAULT_PARTITION_ROWS: usize = 4096;

/// A deferred read of a delimited file.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    source: PathBuf,
    options: ReadOptions,
    schema: Vec<String>,
    partition_rows: usize,
}

impl ScanPlan {
    /// Column names sniffed at scan time.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Execute the plan.
    pub fn collect(self) -> BackendResult<PartitionedFrame> {
        let mut reader = open_reader(&self.source, &self.options)?;
        let headers = decode_record(reader.byte_headers()?, self.options.encoding, 0)?;
        if headers != self.schema {
            return Err(BackendError::Scan {
                path: self.source,
                reason: "header changed between scan and collect".to_string(),
            });
        }

        let mut partitions = Vec::new();
        let mut current = Vec::with_capacity(self.partition_rows);
        for (index, raw) in reader.byte_records().enumerate() {
            let raw = raw?;
            current.push(decode_record(&raw, self.options.encoding, index as u64 + 1)?);
            if current.len() == self.partition_rows {
                partitions.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(self.partition_rows),
                ));
            }
        }
        if !current.is_empty() {
            partitions.push(current);
        }

        Ok(PartitionedFrame {
            columns: self.schema,
            partitions,
        })
    }
}

/// Materialized rows, grouped into fixed-size partitions.
#[derive(Debug, Clone, Default)]
pub struct PartitionedFrame {
    columns: Vec<String>,
    partitions: Vec<Vec<Vec<String>>>,
}

impl PartitionedFrame {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn num_rows(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.partitions.iter().flatten().map(Vec::as_slice)
    }
}

/// Deferred backend with partitioned materialization.
#[derive(Debug, Clone, Copy)]
pub struct LazyBackend {
    partition_rows: usize,
}

impl LazyBackend {
    pub fn new() -> Self {
        Self {
            partition_rows: DEFAULT_PARTITION_ROWS,
        }
    }

    /// Set the partition size. Zero is treated as one.
    pub fn partition_rows(mut self, rows: usize) -> Self {
        self.partition_rows = rows.max(1);
        self
    }

    /// Build the deferred plan without reading any rows.
    pub fn scan(&self, source: &Path, options: &ReadOptions) -> BackendResult<ScanPlan> {
        let mut reader = open_reader(source, options)?;
        let schema = decode_record(reader.byte_headers()?, options.encoding, 0)?;
        if schema.is_empty() {
            return Err(BackendError::Scan {
                path: source.to_path_buf(),
                reason: "no header row".to_string(),
            });
        }

        Ok(ScanPlan {
            source: source.to_path_buf(),
            options: *options,
            schema,
            partition_rows: self.partition_rows,
        })
    }
}

impl Default for LazyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for LazyBackend {
    type Dataset = PartitionedFrame;

    fn description(&self) -> &'static str {
        "lazy scan + partitioned collect (UTF-8 output only)"
    }

    fn read(&self, source: &Path, options: &ReadOptions) -> BackendResult<PartitionedFrame> {
        self.scan(source, options)?.collect()
    }

    fn write(
        &self,
        frame: &PartitionedFrame,
        dest: &Path,
        _encoding: TextEncoding,
    ) -> BackendResult<()> {
        let mut writer = create_writer(dest)?;
        writer.write_record(&frame.columns)?;
        for row in frame.rows() {
            writer.write_record(row)?;
        }
        finish_writer(writer)
    }

    fn timed_read(
        &self,
        meter: &mut Meter,
        source: &Path,
        options: &ReadOptions,
    ) -> BackendResult<Measured<PartitionedFrame>> {
        let build = meter.measure(|| self.scan(source, options)).transpose()?;
        let Measured {
            value: plan,
            elapsed_s: build_s,
            mem_mb: build_mb,
        } = build;

        let collected = meter.measure(move || plan.collect()).transpose()?;

        Ok(Measured {
            value: collected.value,
            elapsed_s: build_s + collected.elapsed_s,
            mem_mb: build_mb.max(collected.mem_mb),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::testing::{ScriptedClock, ScriptedProbe};
    use tempfile::TempDir;

    const MB: u64 = 1024 * 1024;

    fn write_rows(dir: &TempDir, rows: usize) -> PathBuf {
        let path = dir.path().join("in.csv");
        let mut body = String::from("id,value\n");
        for i in 0..rows {
            body.push_str(&format!("{},{}\n", i, i * 2));
        }
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_scan_reads_schema_only() {
        let dir = TempDir::new().unwrap();
        let source = write_rows(&dir, 10);

        let plan = LazyBackend::new()
            .scan(&source, &ReadOptions::default())
            .unwrap();
        assert_eq!(plan.schema(), ["id", "value"]);
    }

    #[test]
    fn test_collect_partitions() {
        let dir = TempDir::new().unwrap();
        let source = write_rows(&dir, 10);

        let frame = LazyBackend::new()
            .partition_rows(4)
            .read(&source, &ReadOptions::default())
            .unwrap();

        assert_eq!(frame.num_partitions(), 3);
        assert_eq!(frame.num_rows(), 10);
        assert_eq!(frame.rows().last().unwrap(), ["9", "18"]);
    }

    #[test]
    fn test_collect_detects_changed_header() {
        let dir = TempDir::new().unwrap();
        let source = write_rows(&dir, 2);

        let plan = LazyBackend::new()
            .scan(&source, &ReadOptions::default())
            .unwrap();
        std::fs::write(&source, "other\n1\n").unwrap();

        assert!(matches!(plan.collect(), Err(BackendError::Scan { .. })));
    }

    #[test]
    fn test_empty_file_fails_scan() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("empty.csv");
        std::fs::write(&source, "").unwrap();

        let result = LazyBackend::new().scan(&source, &ReadOptions::default());
        assert!(matches!(result, Err(BackendError::Scan { .. })));
    }

    #[test]
    fn test_timed_read_takes_max_memory_and_sums_time() {
        let dir = TempDir::new().unwrap();
        let source = write_rows(&dir, 3);

        // Scan phase sits at 50 MB, collect phase at 80 MB.
        let mut meter = Meter::with_sources(
            ScriptedProbe::new([50 * MB, 50 * MB, 80 * MB, 80 * MB]),
            ScriptedClock::from_secs([0.0, 0.1, 1.0, 1.3]),
        );
        let measured = LazyBackend::new()
            .timed_read(&mut meter, &source, &ReadOptions::default())
            .unwrap();

        assert_eq!(measured.mem_mb, 80.0);
        assert!((measured.elapsed_s - 0.4).abs() < 1e-9);
        assert_eq!(measured.value.num_rows(), 3);
    }
}
