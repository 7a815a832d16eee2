// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Eager row-oriented backend.

use std::path::Path;

use csv::StringRecord;

use super::{create_writer, decode_record, finish_writer, open_reader, write_row};
use crate::backend::{Backend, ReadOptions};
use crate::error::BackendResult;
use crate::types::TextEncoding;

/// Rows kept as decoded `StringRecord`s.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RecordSet {
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads the whole file into memory, row by row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordsBackend;

impl Backend for RecordsBackend {
    type Dataset = RecordSet;

    fn description(&self) -> &'static str {
        "eager row store (Vec<StringRecord>)"
    }

    fn read(&self, source: &Path, options: &ReadOptions) -> BackendResult<RecordSet> {
        let mut reader = open_reader(source, options)?;
        let headers = decode_record(reader.byte_headers()?, options.encoding, 0)?;
        let headers = StringRecord::from(headers);

        let mut rows = Vec::new();
        for (index, raw) in reader.byte_records().enumerate() {
            let raw = raw?;
            let fields = decode_record(&raw, options.encoding, index as u64 + 1)?;
            rows.push(StringRecord::from(fields));
        }

        Ok(RecordSet { headers, rows })
    }

    fn write(&self, dataset: &RecordSet, dest: &Path, encoding: TextEncoding) -> BackendResult<()> {
        let mut writer = create_writer(dest)?;
        write_row(&mut writer, dataset.headers.iter(), encoding)?;
        for row in &dataset.rows {
            write_row(&mut writer, row.iter(), encoding)?;
        }
        finish_writer(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Separator;
    use tempfile::TempDir;

    #[test]
    fn test_read_with_custom_separator() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.csv");
        std::fs::write(&source, "a;b\n1;2\n3;4\n").unwrap();

        let options = ReadOptions {
            separator: Separator::new(";").unwrap(),
            ..ReadOptions::default()
        };
        let set = RecordsBackend.read(&source, &options).unwrap();

        assert_eq!(set.headers().iter().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(set.len(), 2);
        assert_eq!(&set.rows()[1][0], "3");
    }

    #[test]
    fn test_write_is_comma_separated() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.csv");
        let dest = dir.path().join("out.csv");
        std::fs::write(&source, "a\tb\nx y\tz\n").unwrap();

        let options = ReadOptions {
            separator: Separator::new("\t").unwrap(),
            ..ReadOptions::default()
        };
        let set = RecordsBackend.read(&source, &options).unwrap();
        RecordsBackend
            .write(&set, &dest, TextEncoding::Utf8)
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "a,b\nx y,z\n");
    }

    #[test]
    fn test_latin1_survives_read_and_write() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.csv");
        let dest = dir.path().join("out.csv");
        std::fs::write(&source, b"name\ncaf\xE9\n").unwrap();

        let options = ReadOptions {
            encoding: TextEncoding::Latin1,
            ..ReadOptions::default()
        };
        let set = RecordsBackend.read(&source, &options).unwrap();
        assert_eq!(&set.rows()[0][0], "café");

        RecordsBackend
            .write(&set, &dest, TextEncoding::Latin1)
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"name\ncaf\xE9\n");
    }

    #[test]
    fn test_ragged_rows_fail() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.csv");
        std::fs::write(&source, "a,b\n1,2,3\n").unwrap();

        assert!(RecordsBackend
            .read(&source, &ReadOptions::default())
            .is_err());
    }
}
