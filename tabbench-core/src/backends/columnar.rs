// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Eager column-oriented backend.
//!
//! `write` ignores the requested encoding and always emits UTF-8.

use std::path::Path;

use super::{create_writer, decode_field, decode_record, finish_writer, open_reader};
use crate::backend::{Backend, ReadOptions};
use crate::error::BackendResult;
use crate::types::TextEncoding;

/// One vector of decoded cells per column.
#[derive(Debug, Clone, Default)]
pub struct ColumnFrame {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
    height: usize,
}

impl ColumnFrame {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.columns[index].as_slice())
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }
}

/// Transposes rows into columns while reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnarBackend;

impl Backend for ColumnarBackend {
    type Dataset = ColumnFrame;

    fn description(&self) -> &'static str {
        "eager column store (UTF-8 output only)"
    }

    fn read(&self, source: &Path, options: &ReadOptions) -> BackendResult<ColumnFrame> {
        let mut reader = open_reader(source, options)?;
        let names = decode_record(reader.byte_headers()?, options.encoding, 0)?;
        let mut columns = vec![Vec::new(); names.len()];
        let mut height = 0;

        // The reader rejects rows whose width differs from the header.
        for raw in reader.byte_records() {
            let raw = raw?;
            height += 1;
            for (field, (bytes, column)) in raw.iter().zip(columns.iter_mut()).enumerate() {
                column.push(decode_field(bytes, options.encoding, height as u64, field)?);
            }
        }

        Ok(ColumnFrame {
            names,
            columns,
            height,
        })
    }

    fn write(
        &self,
        frame: &ColumnFrame,
        dest: &Path,
        _encoding: TextEncoding,
    ) -> BackendResult<()> {
        let mut writer = create_writer(dest)?;
        writer.write_record(&frame.names)?;
        for row in 0..frame.height {
            writer.write_record(frame.columns.iter().map(|column| column[row].as_str()))?;
        }
        finish_writer(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_into_columns() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.csv");
        std::fs::write(&source, "gender,score\nfemale,72\nmale,69\nfemale,90\n").unwrap();

        let frame = ColumnarBackend
            .read(&source, &ReadOptions::default())
            .unwrap();

        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.column("score").unwrap(), ["72", "69", "90"]);
        assert!(frame.column("missing").is_none());
    }

    #[test]
    fn test_write_ignores_encoding() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.csv");
        let dest = dir.path().join("out.csv");
        std::fs::write(&source, b"name\ncaf\xE9\n").unwrap();

        let options = ReadOptions {
            encoding: TextEncoding::Latin1,
            ..ReadOptions::default()
        };
        let frame = ColumnarBackend.read(&source, &options).unwrap();
        ColumnarBackend
            .write(&frame, &dest, TextEncoding::Latin1)
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "name\ncafé\n");
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = ColumnarBackend.read(&dir.path().join("nope.csv"), &ReadOptions::default());
        assert!(result.is_err());
    }
}
