// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for tabbench.
//!
//! Errors are split by how far they are allowed to travel:
//! configuration errors abort the whole run, backend errors never leave
//! a single trial.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::BackendId;

/// Top-level error type for the harness.
#[derive(Debug, Error)]
pub enum TabbenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast, No Trials Run
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    // =========================================================================
    // Report Errors
    // =========================================================================
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors raised while resolving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown backend: {id}")]
    UnknownBackend { id: String },

    #[error("Duplicate backend: {id}")]
    DuplicateBackend { id: BackendId },

    #[error("At least one backend must be selected")]
    EmptyBackendSet,

    #[error("Unsupported text encoding: {label}")]
    UnsupportedEncoding { label: String },
}

/// Failures inside a single read/write trial.
///
/// These are recorded as trial failures and never abort the run.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {encoding} text at record {record}, field {field}")]
    InvalidText {
        encoding: &'static str,
        record: u64,
        field: usize,
    },

    #[error("Character {ch:?} cannot be encoded as {encoding}")]
    Unencodable { ch: char, encoding: &'static str },

    #[error("Deferred scan of {path} failed: {reason}")]
    Scan { path: PathBuf, reason: String },

    #[error("Backend panicked: {message}")]
    Panicked { message: String },
}

/// Result type alias using TabbenchError.
pub type TabbenchResult<T> = Result<T, TabbenchError>;

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidFieldValue {
            field: "separator",
            value: "::".to_string(),
            reason: "must be a single ASCII character".to_string(),
        };
        assert!(err.to_string().contains("separator"));
        assert!(err.to_string().contains("::"));
    }

    #[test]
    fn test_error_chain() {
        let err: TabbenchError = ConfigError::EmptyBackendSet.into();
        assert!(matches!(err, TabbenchError::Config(_)));
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Unencodable {
            ch: 'Ж',
            encoding: "latin-1",
        };
        assert!(err.to_string().contains("latin-1"));
    }
}
