// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Single read-then-write trial.
//!
//! [`run_trial`] is the failure boundary of the harness: whatever goes
//! wrong inside a backend, including a panic, comes back as a
//! [`TrialOutcome::Failure`].

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::Serialize;

use crate::backend::{Backend, ReadOptions};
use crate::error::{BackendError, BackendResult};
use crate::measure::Meter;

/// Measurements from one successful trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialSample {
    pub read_time_s: f64,
    pub write_time_s: f64,
    pub read_mem_mb: f64,
    pub write_mem_mb: f64,
}

/// Result of exactly one trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Sample(TrialSample),
    Failure(String),
}

impl TrialOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TrialOutcome::Sample(_))
    }

    pub fn sample(&self) -> Option<&TrialSample> {
        match self {
            TrialOutcome::Sample(sample) => Some(sample),
            TrialOutcome::Failure(_) => None,
        }
    }
}

impl From<BackendResult<TrialSample>> for TrialOutcome {
    fn from(result: BackendResult<TrialSample>) -> Self {
        match result {
            Ok(sample) => TrialOutcome::Sample(sample),
            Err(err) => TrialOutcome::Failure(err.to_string()),
        }
    }
}

/// Type-erased view of a [`Backend`], so backends with different dataset
/// types can share one registry.
pub trait Workload {
    /// Short human-readable description.
    fn description(&self) -> &'static str;

    /// Measure one read of `source` followed by one write to `dest`.
    fn read_write(
        &self,
        meter: &mut Meter,
        source: &Path,
        dest: &Path,
        options: &ReadOptions,
    ) -> BackendResult<TrialSample>;
}

impl<B: Backend> Workload for B {
    fn description(&self) -> &'static str {
        Backend::description(self)
    }

    fn read_write(
        &self,
        meter: &mut Meter,
        source: &Path,
        dest: &Path,
        options: &ReadOptions,
    ) -> BackendResult<TrialSample> {
        let read = self.timed_read(meter, source, options)?;
        let dataset = read.value;

        let write = meter
            .measure(|| self.write(&dataset, dest, options.encoding))
            .transpose()?;

        Ok(TrialSample {
            read_time_s: read.elapsed_s,
            write_time_s: write.elapsed_s,
            read_mem_mb: read.mem_mb,
            write_mem_mb: write.mem_mb,
        })
    }
}

/// Run one trial and capture any failure, never propagating it.
pub fn run_trial(
    workload: &dyn Workload,
    meter: &mut Meter,
    source: &Path,
    dest: &Path,
    options: &ReadOptions,
) -> TrialOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        workload.read_write(meter, source, dest, options)
    }));

    match result {
        Ok(result) => result.into(),
        Err(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            TrialOutcome::Failure(BackendError::Panicked { message }.to_string())
        }
    }
}
