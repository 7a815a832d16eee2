// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration with command-line overrides.
//!
//! The file is optional: every field has a default. Values are parsed into
//! a raw struct, overlaid with any overrides, then validated into a
//! [`BenchmarkConfig`]. Any invalid field aborts before a single trial runs.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backend::ReadOptions;
use crate::error::{ConfigError, TabbenchError, TabbenchResult};
use crate::report::DEFAULT_REPORT_FILE;
use crate::types::{BackendId, Separator, TextEncoding};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "tabbench.yaml";

const DEFAULT_INPUT: &str = "StudentsPerformance.csv";
const DEFAULT_OUTPUT_DIR: &str = "./bench_results";
const DEFAULT_RUNS: u64 = 1000;

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawConfig {
    input: String,
    output_dir: String,
    report_file: String,
    encoding: String,
    separator: String,
    runs: i64,
    backends: Option<Vec<String>>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            report_file: DEFAULT_REPORT_FILE.to_string(),
            encoding: TextEncoding::default().to_string(),
            separator: Separator::default().to_string(),
            runs: DEFAULT_RUNS as i64,
            backends: None,
        }
    }
}

/// Values that take precedence over the config file, typically from flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub report_file: Option<String>,
    pub encoding: Option<String>,
    pub separator: Option<String>,
    pub runs: Option<i64>,
    pub backends: Option<Vec<String>>,
}

impl RawConfig {
    fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(input) = &overrides.input {
            self.input = input.display().to_string();
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.output_dir = output_dir.display().to_string();
        }
        if let Some(report_file) = &overrides.report_file {
            self.report_file = report_file.clone();
        }
        if let Some(encoding) = &overrides.encoding {
            self.encoding = encoding.clone();
        }
        if let Some(separator) = &overrides.separator {
            self.separator = separator.clone();
        }
        if let Some(runs) = overrides.runs {
            self.runs = runs;
        }
        if let Some(backends) = &overrides.backends {
            self.backends = Some(backends.clone());
        }
    }
}

/// Validated benchmark configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Dataset every backend reads.
    pub input: PathBuf,
    /// Directory for the report and temp output files.
    pub output_dir: PathBuf,
    /// Report file name inside `output_dir`.
    pub report_file: String,
    pub encoding: TextEncoding,
    pub separator: Separator,
    /// Repetitions per backend, always at least 1.
    pub runs: u64,
    /// Selected backends in run order; `None` runs every registered backend.
    pub backends: Option<Vec<BackendId>>,
}

impl BenchmarkConfig {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            encoding: self.encoding,
            separator: self.separator,
        }
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            report_file: DEFAULT_REPORT_FILE.to_string(),
            encoding: TextEncoding::default(),
            separator: Separator::default(),
            runs: DEFAULT_RUNS,
            backends: None,
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is used if present, otherwise built-in defaults.
    pub fn load(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> TabbenchResult<BenchmarkConfig> {
        let mut raw = match path {
            Some(path) => Self::read_raw(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::read_raw(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                tracing::debug!("No config file, using defaults");
                RawConfig::default()
            }
        };

        raw.apply(overrides);
        Self::validate(raw)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> TabbenchResult<BenchmarkConfig> {
        Self::validate(Self::parse_raw(content)?)
    }

    fn read_raw(path: &Path) -> TabbenchResult<RawConfig> {
        if !path.exists() {
            return Err(TabbenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(path = %path.display(), "Loading config file");
        let content = std::fs::read_to_string(path).map_err(|e| TabbenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::parse_raw(&content)
    }

    fn parse_raw(content: &str) -> TabbenchResult<RawConfig> {
        if content.trim().is_empty() {
            return Ok(RawConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| TabbenchError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> TabbenchResult<BenchmarkConfig> {
        if raw.input.trim().is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "input",
                value: raw.input,
                reason: "Input path cannot be empty".to_string(),
            }
            .into());
        }

        if raw.output_dir.trim().is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "output_dir",
                value: raw.output_dir,
                reason: "Output directory cannot be empty".to_string(),
            }
            .into());
        }

        let report_name = Path::new(&raw.report_file).file_name();
        if report_name != Some(OsStr::new(&raw.report_file)) {
            return Err(ConfigError::InvalidFieldValue {
                field: "report_file",
                value: raw.report_file,
                reason: "Must be a plain file name".to_string(),
            }
            .into());
        }

        let encoding: TextEncoding = raw.encoding.parse()?;
        let separator = Separator::new(&raw.separator)?;

        let runs = if raw.runs < 1 {
            tracing::warn!(configured = raw.runs, "runs must be at least 1, using 1");
            1
        } else {
            raw.runs as u64
        };

        let backends = match raw.backends {
            None => None,
            Some(ids) if ids.is_empty() => return Err(ConfigError::EmptyBackendSet.into()),
            Some(ids) => {
                let mut seen = HashSet::new();
                let mut validated = Vec::with_capacity(ids.len());
                for id in ids {
                    let id = BackendId::new(id)?;
                    if !seen.insert(id.clone()) {
                        return Err(ConfigError::DuplicateBackend { id }.into());
                    }
                    validated.push(id);
                }
                Some(validated)
            }
        };

        Ok(BenchmarkConfig {
            input: PathBuf::from(raw.input),
            output_dir: PathBuf::from(raw.output_dir),
            report_file: raw.report_file,
            encoding,
            separator,
            runs,
            backends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID_CONFIG: &str = r#"
input: data/students.csv
output_dir: /tmp/bench
report_file: result.json
encoding: latin-1
separator: ";"
runs: 25
backends:
  - records
  - lazy
"#;

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.input, PathBuf::from("data/students.csv"));
        assert_eq!(config.report_path(), PathBuf::from("/tmp/bench/result.json"));
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert_eq!(config.separator.as_byte(), b';');
        assert_eq!(config.runs, 25);
        assert_eq!(
            config.backends.unwrap(),
            vec![BackendId::new("records").unwrap(), BackendId::new("lazy").unwrap()]
        );
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::load_string("").unwrap();
        assert_eq!(config.input, PathBuf::from("StudentsPerformance.csv"));
        assert_eq!(config.output_dir, PathBuf::from("./bench_results"));
        assert_eq!(config.report_file, "bench_result.json");
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.separator, Separator::COMMA);
        assert_eq!(config.runs, 1000);
        assert!(config.backends.is_none());
        assert_eq!(config, BenchmarkConfig::default());
    }

    #[test]
    fn test_runs_clamped() {
        for runs in ["0", "-5"] {
            let config = ConfigLoader::load_string(&format!("runs: {}", runs)).unwrap();
            assert_eq!(config.runs, 1);
        }
    }

    #[test]
    fn test_overrides_win() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench.yaml");
        std::fs::write(&path, VALID_CONFIG).unwrap();

        let overrides = ConfigOverrides {
            runs: Some(3),
            separator: Some("\t".to_string()),
            backends: Some(vec!["columnar".to_string()]),
            ..Default::default()
        };
        let config = ConfigLoader::load(Some(path.as_path()), &overrides).unwrap();

        assert_eq!(config.runs, 3);
        assert_eq!(config.separator.as_byte(), b'\t');
        assert_eq!(config.encoding, TextEncoding::Latin1);
        assert_eq!(config.backends.unwrap().len(), 1);
    }

    #[test]
    fn test_explicit_missing_file() {
        let result = ConfigLoader::load(
            Some(Path::new("/nonexistent/tabbench.yaml")),
            &ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(TabbenchError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_separator() {
        let result = ConfigLoader::load_string("separator: '::'");
        assert!(matches!(
            result,
            Err(TabbenchError::Config(ConfigError::InvalidFieldValue {
                field: "separator",
                ..
            }))
        ));
    }

    #[test]
    fn test_unsupported_encoding() {
        let result = ConfigLoader::load_string("encoding: cp1251");
        assert!(matches!(
            result,
            Err(TabbenchError::Config(ConfigError::UnsupportedEncoding { .. }))
        ));
    }

    #[test]
    fn test_duplicate_and_empty_backends() {
        let result = ConfigLoader::load_string("backends: [records, records]");
        assert!(matches!(
            result,
            Err(TabbenchError::Config(ConfigError::DuplicateBackend { .. }))
        ));

        let result = ConfigLoader::load_string("backends: []");
        assert!(matches!(
            result,
            Err(TabbenchError::Config(ConfigError::EmptyBackendSet))
        ));
    }

    #[test]
    fn test_report_file_must_be_plain_name() {
        assert!(ConfigLoader::load_string("report_file: ../escape.json").is_err());
        assert!(ConfigLoader::load_string("report_file: ''").is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ConfigLoader::load_string("runs: [not, a, number]");
        assert!(matches!(result, Err(TabbenchError::ConfigParse { .. })));
    }
}
