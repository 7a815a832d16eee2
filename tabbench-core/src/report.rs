// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report assembly and JSON output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::BenchmarkConfig;
use crate::error::{TabbenchError, TabbenchResult};
use crate::summary::BackendSummary;
use crate::types::BackendId;

/// Default file name of the report inside the output directory.
pub const DEFAULT_REPORT_FILE: &str = "bench_result.json";

/// Summaries keyed by backend, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendSummaries(Vec<(BackendId, BackendSummary)>);

impl BackendSummaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: BackendId, summary: BackendSummary) {
        self.0.push((id, summary));
    }

    pub fn get(&self, id: &str) -> Option<&BackendSummary> {
        self.0
            .iter()
            .find(|(entry, _)| entry.as_str() == id)
            .map(|(_, summary)| summary)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BackendId, &BackendSummary)> {
        self.0.iter().map(|(id, summary)| (id, summary))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(BackendId, BackendSummary)> for BackendSummaries {
    fn from_iter<I: IntoIterator<Item = (BackendId, BackendSummary)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for BackendSummaries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, summary) in &self.0 {
            map.serialize_entry(id.as_str(), summary)?;
        }
        map.end()
    }
}

/// The final benchmark report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BenchmarkReport {
    pub input: String,
    pub runs: u64,
    pub separator: String,
    pub libs: BackendSummaries,
}

impl BenchmarkReport {
    /// Assemble the report from the config echoes and the per-backend summaries.
    pub fn build(config: &BenchmarkConfig, libs: BackendSummaries) -> Self {
        Self {
            input: config.input.display().to_string(),
            runs: config.runs,
            separator: config.separator.to_string(),
            libs,
        }
    }
}

/// Written instead of a report when the input dataset is missing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub input: String,
}

impl ErrorReport {
    pub fn input_not_found(input: &Path) -> Self {
        Self {
            error: "input file not found".to_string(),
            input: input.display().to_string(),
        }
    }
}

/// Writes reports as pretty-printed JSON into an output directory.
pub struct JsonReporter {
    output_dir: PathBuf,
    file_name: String,
}

impl JsonReporter {
    /// Create a reporter, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>, file_name: impl Into<String>) -> TabbenchResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|e| TabbenchError::Io {
            context: "creating output directory",
            source: e,
        })?;
        Ok(Self {
            output_dir,
            file_name: file_name.into(),
        })
    }

    /// Full path of the report file.
    pub fn path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    /// Save any serializable document, replacing a previous report.
    ///
    /// Returns the path to the written file.
    pub fn save<T: Serialize>(&self, document: &T) -> TabbenchResult<PathBuf> {
        let filepath = self.path();
        let file = File::create(&filepath).map_err(|e| TabbenchError::Io {
            context: "creating report file",
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush().map_err(|e| TabbenchError::Io {
            context: "writing report file",
            source: e,
        })?;

        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::MeanStats;
    use serde_json::json;
    use tempfile::TempDir;

    fn id(s: &str) -> BackendId {
        BackendId::new(s).unwrap()
    }

    #[test]
    fn test_libs_keep_registration_order() {
        let libs: BackendSummaries = vec![
            (id("zeta"), BackendSummary::all_runs_failed()),
            (id("alpha"), BackendSummary::all_runs_failed()),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&libs).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
    }

    #[test]
    fn test_report_schema() {
        let mut config = BenchmarkConfig::default();
        config.input = PathBuf::from("data.csv");
        config.runs = 3;

        let mut libs = BackendSummaries::new();
        libs.push(
            id("records"),
            BackendSummary::Measured(MeanStats {
                read_time_s: 0.5,
                write_time_s: 0.25,
                read_mem_mb: 10.0,
                write_mem_mb: 12.0,
                runs_used: 3,
            }),
        );
        libs.push(id("lazy"), BackendSummary::all_runs_failed());

        let report = BenchmarkReport::build(&config, libs);
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "input": "data.csv",
                "runs": 3,
                "separator": ",",
                "libs": {
                    "records": {
                        "read_time_s": 0.5,
                        "write_time_s": 0.25,
                        "read_mem_mb": 10.0,
                        "write_mem_mb": 12.0,
                        "runs_used": 3
                    },
                    "lazy": { "error": "all runs failed" }
                }
            })
        );
    }

    #[test]
    fn test_save_pretty_json() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("nested").join("results");
        let reporter = JsonReporter::new(&out, DEFAULT_REPORT_FILE).unwrap();

        let path = reporter
            .save(&ErrorReport::input_not_found(Path::new("missing.csv")))
            .unwrap();

        assert_eq!(path, out.join(DEFAULT_REPORT_FILE));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "{\n  \"error\": \"input file not found\",\n  \"input\": \"missing.csv\"\n}"
        );
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path(), "r.json").unwrap();

        let path = reporter
            .save(&ErrorReport::input_not_found(Path::new("данные.csv")))
            .unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("данные.csv"));
    }
}
