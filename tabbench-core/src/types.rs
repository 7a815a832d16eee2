// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! All types validate their invariants at creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Validated backend identifier.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 32 chars.
///
/// The identifier ends up in temp file names, so path characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackendId(String);

impl BackendId {
    /// Create a new BackendId with validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "backend",
                value: id,
                reason: "Backend ID cannot be empty".to_string(),
            });
        }

        if id.len() > 32 {
            return Err(ConfigError::InvalidFieldValue {
                field: "backend",
                value: id.clone(),
                reason: format!("Backend ID too long: {} chars (max 32)", id.len()),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidFieldValue {
                field: "backend",
                value: id,
                reason: "Backend ID must contain only ASCII alphanumerics, hyphens, and underscores"
                    .to_string(),
            });
        }

        Ok(Self(id))
    }

    /// Identifier of a built-in backend. The literal follows the same rules as [`BackendId::new`].
    pub(crate) fn builtin(id: &'static str) -> Self {
        debug_assert!(Self::new(id).is_ok(), "invalid built-in backend id {:?}", id);
        Self(id.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BackendId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BackendId> for String {
    fn from(id: BackendId) -> Self {
        id.0
    }
}

/// Validated field separator: exactly one ASCII character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Separator(u8);

impl Separator {
    /// Comma, the default separator.
    pub const COMMA: Separator = Separator(b',');

    /// Create a separator from its textual form.
    pub fn new(value: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidFieldValue {
            field: "separator",
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut bytes = value.bytes();
        match (bytes.next(), bytes.next()) {
            (Some(b), None) if b.is_ascii() => {
                if b == b'"' || b == b'\n' || b == b'\r' {
                    Err(invalid("Separator cannot be a quote or line terminator"))
                } else {
                    Ok(Self(b))
                }
            }
            (None, _) => Err(invalid("Separator cannot be empty")),
            _ => Err(invalid("Separator must be a single ASCII character")),
        }
    }

    /// The separator as a raw byte, as the csv reader expects it.
    pub fn as_byte(&self) -> u8 {
        self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::COMMA
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

impl TryFrom<String> for Separator {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Separator> for String {
    fn from(sep: Separator) -> Self {
        sep.to_string()
    }
}

/// Text encoding of the dataset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Canonical label, as echoed back in logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }
}

impl FromStr for TextEncoding {
    type Err = ConfigError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Ok(TextEncoding::Latin1),
            _ => Err(ConfigError::UnsupportedEncoding {
                label: label.to_string(),
            }),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(encoding: TextEncoding) -> Self {
        encoding.label().to_string()
    }
}
