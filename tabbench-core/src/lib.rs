// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! tabbench core library
//!
//! Measures interchangeable tabular-data backends on the same
//! read-then-write workload and reports mean wall-clock time and
//! approximate resident memory per backend.
//!
//! # Pipeline
//!
//! - **Measure**: [`Meter`] times a closure and samples process memory around it
//! - **Trial**: [`run_trial`] performs one measured read + write, capturing any failure
//! - **Summarize**: [`summarize`] averages the successful trials of a backend
//! - **Report**: [`BenchmarkReport`] echoes the config and maps backend id to summary
//!
//! [`SuiteRunner`] strings these together across a [`BackendRegistry`].

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod measure;
pub mod registry;
pub mod report;
pub mod runner;
pub mod summary;
pub mod trial;
pub mod types;

// Re-export commonly used types
pub use backend::{Backend, ReadOptions};
pub use config::{BenchmarkConfig, ConfigLoader, ConfigOverrides};
pub use error::{BackendError, BackendResult, ConfigError, TabbenchError, TabbenchResult};
pub use measure::{Clock, Measured, MemoryProbe, Meter};
pub use registry::{BackendEntry, BackendRegistry};
pub use report::{BackendSummaries, BenchmarkReport, ErrorReport, JsonReporter};
pub use runner::{SuiteOutcome, SuiteRunner};
pub use summary::{summarize, BackendSummary, MeanStats};
pub use trial::{run_trial, TrialOutcome, TrialSample, Workload};
pub use types::{BackendId, Separator, TextEncoding};
