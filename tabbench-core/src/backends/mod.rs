// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Built-in backends.
//!
//! All three parse with the `csv` crate but keep the data in different
//! shapes and follow different read strategies:
//!
//! - **records**: eager, one `StringRecord` per row
//! - **columnar**: eager, one vector per column
//! - **lazy**: deferred scan plan, materialized into row partitions on collect
//!
//! Output is always comma-separated regardless of the input separator.

pub mod columnar;
pub mod lazy;
pub mod records;

pub use columnar::{ColumnFrame, ColumnarBackend};
pub use lazy::{LazyBackend, PartitionedFrame, ScanPlan};
pub use records::{RecordSet, RecordsBackend};

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use csv::{ByteRecord, Reader, ReaderBuilder, Writer};

use crate::backend::ReadOptions;
use crate::error::{BackendError, BackendResult};
use crate::types::TextEncoding;

/// Open a header-aware reader for `source`.
pub(crate) fn open_reader(source: &Path, options: &ReadOptions) -> BackendResult<Reader<File>> {
    let file = File::open(source).map_err(|e| BackendError::Io {
        context: "opening dataset",
        source: e,
    })?;

    Ok(ReaderBuilder::new()
        .delimiter(options.separator.as_byte())
        .has_headers(true)
        .from_reader(file))
}

/// Create a comma-separated writer at `dest`, truncating any existing file.
pub(crate) fn create_writer(dest: &Path) -> BackendResult<Writer<File>> {
    let file = File::create(dest).map_err(|e| BackendError::Io {
        context: "creating output file",
        source: e,
    })?;
    Ok(Writer::from_writer(file))
}

/// Flush buffered rows so the file is complete when `write` returns.
pub(crate) fn finish_writer(mut writer: Writer<File>) -> BackendResult<()> {
    writer.flush().map_err(|e| BackendError::Io {
        context: "flushing output file",
        source: e,
    })
}

/// Decode one raw field.
pub(crate) fn decode_field(
    bytes: &[u8],
    encoding: TextEncoding,
    record: u64,
    field: usize,
) -> BackendResult<String> {
    match encoding {
        TextEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| BackendError::InvalidText {
                encoding: encoding.label(),
                record,
                field,
            }),
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Decode every field of a raw record. `record` is 0 for the header row.
pub(crate) fn decode_record(
    raw: &ByteRecord,
    encoding: TextEncoding,
    record: u64,
) -> BackendResult<Vec<String>> {
    raw.iter()
        .enumerate()
        .map(|(field, bytes)| decode_field(bytes, encoding, record, field))
        .collect()
}

/// Encode one field for output.
pub(crate) fn encode_field(field: &str, encoding: TextEncoding) -> BackendResult<Cow<'_, [u8]>> {
    match encoding {
        TextEncoding::Utf8 => Ok(Cow::Borrowed(field.as_bytes())),
        TextEncoding::Latin1 => field
            .chars()
            .map(|ch| {
                u8::try_from(u32::from(ch)).map_err(|_| BackendError::Unencodable {
                    ch,
                    encoding: encoding.label(),
                })
            })
            .collect::<BackendResult<Vec<u8>>>()
            .map(Cow::Owned),
    }
}

/// Encode and write one row.
pub(crate) fn write_row<'a, W: std::io::Write>(
    writer: &mut Writer<W>,
    fields: impl IntoIterator<Item = &'a str>,
    encoding: TextEncoding,
) -> BackendResult<()> {
    let encoded = fields
        .into_iter()
        .map(|field| encode_field(field, encoding))
        .collect::<BackendResult<Vec<_>>>()?;
    writer.write_record(&encoded)?;
    Ok(())
}
