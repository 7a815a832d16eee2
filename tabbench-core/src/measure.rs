// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Measurement primitive for timing work and sampling process memory.
//!
//! A [`Meter`] runs a closure exactly once and reports the elapsed time on
//! a monotonic clock together with the mean of two resident-memory samples
//! taken right before and right after the work.
//!
//! The memory figure is a coarse proxy: it is not a peak and it is not
//! attributed to the measured call. Both the memory source and the clock are
//! traits so they can be replaced by a finer profiler or by test doubles.
//!
//! There is no reclamation pass between measurements. Values produced by a
//! trial are dropped when the trial scope ends, which happens before the next
//! trial takes its first sample.

use std::time::{Duration, Instant};

use sysinfo::{Pid, System};

/// Bytes per megabyte used for every memory figure in reports.
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Source of resident-memory samples, in bytes.
pub trait MemoryProbe {
    fn resident_bytes(&mut self) -> u64;
}

/// Resident set size of the current process, read through `sysinfo`.
pub struct ProcessMemory {
    system: System,
    pid: Option<Pid>,
}

impl ProcessMemory {
    /// Create a probe bound to the current process.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(reason) => {
                tracing::warn!(%reason, "Cannot resolve current pid, memory samples will be 0");
                None
            }
        };

        Self {
            system: System::new(),
            pid,
        }
    }
}

impl Default for ProcessMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for ProcessMemory {
    fn resident_bytes(&mut self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };

        if !self.system.refresh_process(pid) {
            return 0;
        }

        self.system
            .process(pid)
            .map(|process| process.memory())
            .unwrap_or(0)
    }
}

/// Monotonic time source. Readings are offsets from an arbitrary origin.
pub trait Clock {
    fn now(&mut self) -> Duration;
}

/// Clock backed by [`std::time::Instant`].
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// The outcome of one measured unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Measured<T> {
    /// Whatever the work returned.
    pub value: T,
    /// Wall-clock seconds, never negative.
    pub elapsed_s: f64,
    /// Mean of the before/after resident-memory samples, in megabytes.
    pub mem_mb: f64,
}

impl<T, E> Measured<Result<T, E>> {
    /// Turn a measured fallible result into a fallible measurement.
    pub fn transpose(self) -> Result<Measured<T>, E> {
        let Measured {
            value,
            elapsed_s,
            mem_mb,
        } = self;
        value.map(|value| Measured {
            value,
            elapsed_s,
            mem_mb,
        })
    }
}

/// Runs work and measures it.
pub struct Meter {
    probe: Box<dyn MemoryProbe>,
    clock: Box<dyn Clock>,
}

impl Meter {
    /// Meter sampling this process's RSS on the monotonic clock.
    pub fn new() -> Self {
        Self::with_sources(ProcessMemory::new(), MonotonicClock::new())
    }

    /// Meter with custom memory and time sources.
    pub fn with_sources(probe: impl MemoryProbe + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            probe: Box::new(probe),
            clock: Box::new(clock),
        }
    }

    /// Run `work` exactly once and measure it.
    ///
    /// Errors and panics raised by `work` are not intercepted here.
    pub fn measure<F, T>(&mut self, work: F) -> Measured<T>
    where
        F: FnOnce() -> T,
    {
        let mem_before = self.probe.resident_bytes();
        let start = self.clock.now();

        let value = work();

        let end = self.clock.now();
        let mem_after = self.probe.resident_bytes();

        Measured {
            value,
            elapsed_s: end.saturating_sub(start).as_secs_f64(),
            mem_mb: average_mb(mem_before, mem_after),
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean of two byte samples, in megabytes.
pub fn average_mb(before: u64, after: u64) -> f64 {
    ((before as f64 + after as f64) / 2.0) / BYTES_PER_MB
}
