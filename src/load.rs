use std::fmt;
use std::path::Path;

use log::info;
use rust_decimal::Decimal;

use crate::{
    data::{RawRecord, RawTable, parse_decimal},
    error::LoadError,
    io_utils,
    schema::HeaderMap,
};

/// Reads `path` into memory, validating the header against the fixed schema
/// and typing every field. String fields are kept verbatim; a blank
/// `quantity` loads as missing; `unit_price` must be present, numeric, and
/// non-negative. `limit` caps the number of data rows read (0 = no cap).
pub fn load_table(path: &Path, delimiter: u8, limit: usize) -> Result<RawTable, LoadError> {
    let mut reader = io_utils::open_csv_reader(path, delimiter)?;
    let headers = io_utils::reader_headers(path, &mut reader)?;
    let map = HeaderMap::resolve(path, &headers)?;

    let mut records = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        if limit > 0 && row_idx >= limit {
            break;
        }
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let fields = io_utils::decode_record(path, &record)?;
        records.push(typed_record(path, row_idx + 2, &map, &fields)?);
    }
    info!("Loaded {} row(s) from {}", records.len(), path.display());
    Ok(RawTable { records })
}

fn typed_record(
    path: &Path,
    row: usize,
    map: &HeaderMap,
    fields: &[String],
) -> Result<RawRecord, LoadError> {
    let quantity_raw = map.quantity(fields).trim();
    let quantity = if quantity_raw.is_empty() {
        None
    } else {
        let value =
            parse_decimal(quantity_raw).map_err(|err| field_error(path, row, "quantity", err))?;
        ensure_non_negative(path, row, "quantity", value)?;
        Some(value)
    };

    let price_raw = map.unit_price(fields).trim();
    if price_raw.is_empty() {
        return Err(field_error(path, row, "unit_price", "value is required"));
    }
    let unit_price =
        parse_decimal(price_raw).map_err(|err| field_error(path, row, "unit_price", err))?;
    ensure_non_negative(path, row, "unit_price", unit_price)?;

    Ok(RawRecord {
        date: map.date(fields).to_string(),
        category: map.category(fields).to_string(),
        city: map.city(fields).to_string(),
        product: map.product(fields).to_string(),
        quantity,
        unit_price,
    })
}

fn ensure_non_negative(
    path: &Path,
    row: usize,
    column: &str,
    value: Decimal,
) -> Result<(), LoadError> {
    if value < Decimal::ZERO {
        return Err(field_error(path, row, column, format!("negative value {value}")));
    }
    Ok(())
}

fn field_error(path: &Path, row: usize, column: &str, reason: impl fmt::Display) -> LoadError {
    LoadError::Field {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        reason: reason.to_string(),
    }
}
