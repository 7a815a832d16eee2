// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Capability contract every data backend implements.
//!
//! A backend reads a delimited file into its own native dataset type and
//! writes that dataset back out. The harness never looks inside a dataset.

use std::path::Path;

use crate::error::BackendResult;
use crate::measure::{Measured, Meter};
use crate::types::{Separator, TextEncoding};

/// Settings shared by every read in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    pub encoding: TextEncoding,
    pub separator: Separator,
}

/// A tabular data backend.
pub trait Backend {
    /// Native in-memory representation produced by `read`.
    type Dataset;

    /// Short human-readable description, shown by `tabbench backends`.
    fn description(&self) -> &'static str;

    /// Read the whole dataset at `source`.
    fn read(&self, source: &Path, options: &ReadOptions) -> BackendResult<Self::Dataset>;

    /// Persist `dataset` to `dest`, replacing any existing file.
    fn write(&self, dataset: &Self::Dataset, dest: &Path, encoding: TextEncoding)
        -> BackendResult<()>;

    /// Read under measurement.
    ///
    /// Backends with a multi-phase read override this so the reported
    /// figure covers every phase.
    fn timed_read(
        &self,
        meter: &mut Meter,
        source: &Path,
        options: &ReadOptions,
    ) -> BackendResult<Measured<Self::Dataset>> {
        meter.measure(|| self.read(source, options)).transpose()
    }
}
