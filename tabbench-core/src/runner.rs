// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Suite runner: every selected backend, `runs` trials each, one report.
//!
//! Backends and trials run strictly one after another on the calling
//! thread, so memory samples are never shared with another trial and
//! temp paths are never contended.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::backend::ReadOptions;
use crate::config::BenchmarkConfig;
use crate::error::TabbenchResult;
use crate::measure::Meter;
use crate::registry::{BackendEntry, BackendRegistry};
use crate::report::{BackendSummaries, BenchmarkReport, ErrorReport, JsonReporter};
use crate::summary::{summarize, BackendSummary};
use crate::trial::{run_trial, TrialOutcome};
use crate::types::BackendId;

/// Exit code when the suite completed, whatever the backends did.
pub const EXIT_OK: i32 = 0;
/// Exit code when the input dataset does not exist.
pub const EXIT_INPUT_MISSING: i32 = 2;

const MAX_PREALLOCATED_OUTCOMES: usize = 1024;

/// How a suite run ended.
#[derive(Debug)]
pub enum SuiteOutcome {
    /// All backends ran; the report was written to `path`.
    Completed {
        report: BenchmarkReport,
        path: PathBuf,
    },
    /// The input was missing; an error report was written to `path`.
    InputMissing { path: PathBuf },
}

impl SuiteOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SuiteOutcome::Completed { .. } => EXIT_OK,
            SuiteOutcome::InputMissing { .. } => EXIT_INPUT_MISSING,
        }
    }

    pub fn report_path(&self) -> &Path {
        match self {
            SuiteOutcome::Completed { path, .. } | SuiteOutcome::InputMissing { path } => path,
        }
    }
}

/// Runs the whole benchmark pipeline for one configuration.
pub struct SuiteRunner<'a> {
    config: &'a BenchmarkConfig,
    registry: &'a BackendRegistry,
    meter: Meter,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(config: &'a BenchmarkConfig, registry: &'a BackendRegistry) -> Self {
        Self {
            config,
            registry,
            meter: Meter::new(),
        }
    }

    /// Replace the default process-memory meter.
    pub fn with_meter(mut self, meter: Meter) -> Self {
        self.meter = meter;
        self
    }

    /// Run the suite and write the report.
    ///
    /// Errors are limited to configuration problems and report I/O; backend
    /// failures end up inside the report.
    pub fn run(&mut self) -> TabbenchResult<SuiteOutcome> {
        let config = self.config;
        let registry = self.registry;
        let selected = registry.select(config.backends.as_deref())?;
        let reporter = JsonReporter::new(&config.output_dir, config.report_file.clone())?;

        if !config.input.exists() {
            tracing::error!(input = %config.input.display(), "Input file not found");
            let path = reporter.save(&ErrorReport::input_not_found(&config.input))?;
            return Ok(SuiteOutcome::InputMissing { path });
        }

        tracing::info!(
            input = %config.input.display(),
            runs = config.runs,
            backends = selected.len(),
            "Starting benchmark suite"
        );

        let options = config.read_options();
        let mut libs = BackendSummaries::new();
        for entry in selected {
            let outcomes = self.run_backend(entry, &options);
            let summary = summarize(&outcomes);
            log_summary(&entry.id, &summary, outcomes.len());
            libs.push(entry.id.clone(), summary);
        }

        let report = BenchmarkReport::build(config, libs);
        let path = reporter.save(&report)?;
        tracing::info!(path = %path.display(), "Report written");

        Ok(SuiteOutcome::Completed { report, path })
    }

    /// Run every trial of one backend, cleaning up after each.
    pub fn run_backend(
        &mut self,
        entry: &BackendEntry,
        options: &ReadOptions,
    ) -> Vec<TrialOutcome> {
        let config = self.config;
        let mut outcomes = Vec::with_capacity(outcome_capacity(config.runs));

        for index in 0..config.runs {
            let dest = temp_path(&config.output_dir, &entry.id, index);
            let outcome = run_trial(
                entry.workload.as_ref(),
                &mut self.meter,
                &config.input,
                &dest,
                options,
            );
            remove_temp(&dest);

            match &outcome {
                TrialOutcome::Sample(sample) => tracing::debug!(
                    backend = %entry.id,
                    trial = index,
                    read_time_s = sample.read_time_s,
                    write_time_s = sample.write_time_s,
                    "Trial complete"
                ),
                TrialOutcome::Failure(reason) => tracing::warn!(
                    backend = %entry.id,
                    trial = index,
                    %reason,
                    "Trial failed"
                ),
            }
            outcomes.push(outcome);
        }

        outcomes
    }
}

/// Temp output path owned by trial `index` of `backend`.
/// Pre-allocation for a backend's outcomes. Larger run counts grow on demand.
fn outcome_capacity(runs: u64) -> usize {
    usize::try_from(runs).map_or(MAX_PREALLOCATED_OUTCOMES, |n| {
        n.min(MAX_PREALLOCATED_OUTCOMES)
    })
}

pub fn temp_path(output_dir: &Path, backend: &BackendId, index: u64) -> PathBuf {
    output_dir.join(format!("tmp_{}_{}.csv", backend, index))
}

/// Best-effort removal; failures never affect the trial outcome.
fn remove_temp(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

fn log_summary(id: &BackendId, summary: &BackendSummary, attempted: usize) {
    match summary {
        BackendSummary::Measured(stats) => tracing::info!(
            backend = %id,
            runs_used = stats.runs_used,
            attempted,
            read_time_s = stats.read_time_s,
            write_time_s = stats.write_time_s,
            "Backend summarized"
        ),
        BackendSummary::Failed { error } => tracing::warn!(
            backend = %id,
            attempted,
            %error,
            "Backend failed"
        ),
    }
}
