// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Ordered registry of backends.
//!
//! Registration order is run order and report order.

use crate::backends::{ColumnarBackend, LazyBackend, RecordsBackend};
use crate::error::ConfigError;
use crate::trial::Workload;
use crate::types::BackendId;

/// Entry in the backend registry.
pub struct BackendEntry {
    pub id: BackendId,
    pub workload: Box<dyn Workload>,
}

impl std::fmt::Debug for BackendEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendEntry")
            .field("id", &self.id)
            .field("description", &self.workload.description())
            .finish()
    }
}

/// Registry of backends, kept in registration order.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    entries: Vec<BackendEntry>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in backends.
    pub fn with_builtin() -> Self {
        let entries = vec![
            BackendEntry {
                id: BackendId::builtin("records"),
                workload: Box::new(RecordsBackend),
            },
            BackendEntry {
                id: BackendId::builtin("columnar"),
                workload: Box::new(ColumnarBackend),
            },
            BackendEntry {
                id: BackendId::builtin("lazy"),
                workload: Box::new(LazyBackend::new()),
            },
        ];
        debug_assert!(
            entries
                .iter()
                .enumerate()
                .all(|(i, entry)| entries[..i].iter().all(|prev| prev.id != entry.id)),
            "duplicate built-in backend id"
        );

        Self { entries }
    }

    /// Register a backend under `id`.
    /// Fails if the id is already taken.
    pub fn register(
        &mut self,
        id: BackendId,
        workload: impl Workload + 'static,
    ) -> Result<(), ConfigError> {
        self.register_boxed(id, Box::new(workload))
    }

    fn register_boxed(
        &mut self,
        id: BackendId,
        workload: Box<dyn Workload>,
    ) -> Result<(), ConfigError> {
        if self.contains(&id) {
            return Err(ConfigError::DuplicateBackend { id });
        }
        self.entries.push(BackendEntry { id, workload });
        Ok(())
    }

    pub fn contains(&self, id: &BackendId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    pub fn get(&self, id: &BackendId) -> Option<&BackendEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<&BackendId> {
        self.entries.iter().map(|entry| &entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a selection to entries.
    ///
    /// `None` selects every backend in registration order. An explicit
    /// selection keeps the registration order too, whatever order it was
    /// given in.
    pub fn select(
        &self,
        selection: Option<&[BackendId]>,
    ) -> Result<Vec<&BackendEntry>, ConfigError> {
        let Some(selection) = selection else {
            return Ok(self.entries.iter().collect());
        };

        if let Some(unknown) = selection.iter().find(|id| !self.contains(id)) {
            return Err(ConfigError::UnknownBackend {
                id: unknown.to_string(),
            });
        }

        Ok(self
            .entries
            .iter()
            .filter(|entry| selection.contains(&entry.id))
            .collect())
    }
}
