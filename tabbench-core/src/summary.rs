// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-backend aggregation of trial outcomes.
//!
//! Failed trials are dropped, never counted as zeros. Each metric is the
//! plain arithmetic mean over the successful trials.

use serde::Serialize;

use crate::trial::{TrialOutcome, TrialSample};

/// Marker recorded when no trial of a backend succeeded.
pub const ALL_RUNS_FAILED: &str = "all runs failed";

/// Mean measurements over the successful trials of one backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStats {
    pub read_time_s: f64,
    pub write_time_s: f64,
    pub read_mem_mb: f64,
    pub write_mem_mb: f64,
    /// Number of trials the means were computed from.
    pub runs_used: usize,
}

/// Aggregate for one backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BackendSummary {
    Measured(MeanStats),
    Failed { error: String },
}

impl BackendSummary {
    pub fn all_runs_failed() -> Self {
        BackendSummary::Failed {
            error: ALL_RUNS_FAILED.to_string(),
        }
    }

    pub fn stats(&self) -> Option<&MeanStats> {
        match self {
            BackendSummary::Measured(stats) => Some(stats),
            BackendSummary::Failed { .. } => None,
        }
    }
}

/// Reduce the outcomes of every trial of one backend into a summary.
pub fn summarize(outcomes: &[TrialOutcome]) -> BackendSummary {
    let samples: Vec<&TrialSample> = outcomes.iter().filter_map(TrialOutcome::sample).collect();

    if samples.is_empty() {
        return BackendSummary::all_runs_failed();
    }

    let mean = |metric: fn(&TrialSample) -> f64| {
        samples.iter().map(|s| metric(s)).sum::<f64>() / samples.len() as f64
    };

    BackendSummary::Measured(MeanStats {
        read_time_s: mean(|s| s.read_time_s),
        write_time_s: mean(|s| s.write_time_s),
        read_mem_mb: mean(|s| s.read_mem_mb),
        write_mem_mb: mean(|s| s.write_mem_mb),
        runs_used: samples.len(),
    })
}
