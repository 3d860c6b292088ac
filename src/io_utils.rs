//! CSV input plumbing: delimiter resolution, reader construction, and
//! byte-record decoding. All file reads flow through here.

use std::{fs::File, io::BufReader, path::Path};

use encoding_rs::UTF_8;

use crate::error::LoadError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Extension-based delimiter auto-detection (`.tsv` implies tab) with
/// manual override support.
pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<BufReader<File>>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    Ok(builder.from_reader(BufReader::new(file)))
}

pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<String, LoadError> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        Err(LoadError::Decode {
            path: path.to_path_buf(),
        })
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(path: &Path, record: &csv::ByteRecord) -> Result<Vec<String>, LoadError> {
    record
        .iter()
        .map(|field| decode_bytes(path, field))
        .collect()
}

pub fn reader_headers(
    path: &Path,
    reader: &mut csv::Reader<BufReader<File>>,
) -> Result<Vec<String>, LoadError> {
    let headers = reader
        .byte_headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    decode_record(path, &headers)
}
