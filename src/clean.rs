use std::collections::HashSet;

use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;

use crate::{
    data::{RawTable, SalesRecord, SalesTable, parse_naive_date},
    error::ParseError,
};

/// What the cleaning pass did, for the console log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub imputed_rows: usize,
    pub median_quantity: Decimal,
    pub duplicates_dropped: usize,
}

/// Cleans `raw`: parses every date, imputes missing quantities with the
/// column median, drops exact duplicates (first occurrence wins), and
/// derives `total_sales` for each surviving row.
///
/// The first unparseable date aborts the run. Imputation happens before
/// duplicate detection, so two rows differing only in a missing quantity
/// can become identical and collapse to one.
pub fn clean(raw: RawTable) -> Result<(SalesTable, CleanReport), ParseError> {
    let mut dates = Vec::with_capacity(raw.len());
    for (idx, record) in raw.records.iter().enumerate() {
        let parsed = parse_naive_date(record.date.trim()).map_err(|_| ParseError::Date {
            row: idx + 2,
            value: record.date.clone(),
        })?;
        dates.push(parsed);
    }

    let present = raw
        .records
        .iter()
        .filter_map(|record| record.quantity)
        .collect::<Vec<_>>();
    let median = match median_of(&present) {
        Some(value) => value,
        None => {
            if !raw.is_empty() {
                warn!("Every quantity value is missing; imputing 0 for all rows");
            }
            Decimal::ZERO
        }
    };
    let imputed_rows = raw
        .records
        .iter()
        .filter(|record| record.quantity.is_none())
        .count();

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());
    let mut duplicates_dropped = 0usize;
    // The full total bounds every downstream group sum.
    let mut revenue = Decimal::ZERO;
    for (idx, (record, date)) in raw.records.into_iter().zip(dates).enumerate() {
        let quantity = record.quantity.unwrap_or(median);
        let total_sales =
            quantity
                .checked_mul(record.unit_price)
                .ok_or(ParseError::TotalOverflow {
                    row: idx + 2,
                    quantity,
                    unit_price: record.unit_price,
                })?;
        let cleaned = SalesRecord {
            date,
            category: record.category,
            city: record.city,
            product: record.product,
            quantity,
            unit_price: record.unit_price,
            total_sales,
        };
        if seen.insert(dedup_key(&cleaned)) {
            revenue = revenue
                .checked_add(total_sales)
                .ok_or(ParseError::RevenueOverflow { row: idx + 2 })?;
            records.push(cleaned);
        } else {
            duplicates_dropped += 1;
        }
    }

    info!(
        "Cleaned table: {} row(s) kept, {} quantity value(s) imputed, {} duplicate(s) dropped",
        records.len(),
        imputed_rows,
        duplicates_dropped
    );
    Ok((
        SalesTable { records },
        CleanReport {
            imputed_rows,
            median_quantity: median,
            duplicates_dropped,
        },
    ))
}

// Every input column participates; total_sales is determined by the rest.
fn dedup_key(record: &SalesRecord) -> (NaiveDate, String, String, String, Decimal, Decimal) {
    (
        record.date,
        record.category.clone(),
        record.city.clone(),
        record.product.clone(),
        record.quantity,
        record.unit_price,
    )
}

fn median_of(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        let lower = sorted[mid - 1];
        let upper = sorted[mid];
        // Midpoint form; lower + upper can exceed Decimal::MAX.
        Some(lower + (upper - lower) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}
