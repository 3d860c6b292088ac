use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    data::RawTable,
    schema::{self, COLUMNS, ColumnType},
};

/// Declared type plus missing-value count for one column.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: &'static str,
    pub datatype: ColumnType,
    pub missing: usize,
}

/// Summary statistics over the non-missing values of one numeric column.
#[derive(Debug, Clone)]
pub struct NumericSummary {
    pub name: &'static str,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
}

/// Everything the inspection pass reports. Diagnostic only; never drives
/// control flow.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub rows: usize,
    pub columns: usize,
    pub profiles: Vec<ColumnProfile>,
    pub numeric: Vec<NumericSummary>,
}

pub fn inspect(table: &RawTable) -> Inspection {
    let mut missing = [0usize; COLUMNS.len()];
    let mut quantity = NumericAccumulator::new("quantity");
    let mut unit_price = NumericAccumulator::new("unit_price");

    for record in &table.records {
        if record.date.trim().is_empty() {
            missing[schema::DATE] += 1;
        }
        if record.category.trim().is_empty() {
            missing[schema::CATEGORY] += 1;
        }
        if record.city.trim().is_empty() {
            missing[schema::CITY] += 1;
        }
        if record.product.trim().is_empty() {
            missing[schema::PRODUCT] += 1;
        }
        match record.quantity {
            Some(value) => quantity.add(value),
            None => missing[schema::QUANTITY] += 1,
        }
        unit_price.add(record.unit_price);
    }

    let profiles = COLUMNS
        .iter()
        .enumerate()
        .map(|(idx, column)| ColumnProfile {
            name: column.name,
            datatype: column.datatype,
            missing: missing[idx],
        })
        .collect();

    let numeric = [quantity.summarize(), unit_price.summarize()]
        .into_iter()
        .flatten()
        .collect();

    Inspection {
        rows: table.len(),
        columns: COLUMNS.len(),
        profiles,
        numeric,
    }
}

struct NumericAccumulator {
    name: &'static str,
    values: Vec<f64>,
}

impl NumericAccumulator {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    fn add(&mut self, value: Decimal) {
        if let Some(value) = value.to_f64() {
            self.values.push(value);
        }
    }

    fn summarize(mut self) -> Option<NumericSummary> {
        if self.values.is_empty() {
            return None;
        }
        self.values.sort_by(|a, b| a.total_cmp(b));
        let count = self.values.len();
        let mean = self.values.iter().sum::<f64>() / count as f64;
        Some(NumericSummary {
            name: self.name,
            count,
            min: self.values[0],
            max: self.values[count - 1],
            mean,
            p25: percentile(&self.values, 0.25),
            median: percentile(&self.values, 0.5),
            p75: percentile(&self.values, 0.75),
        })
    }
}

// Linear interpolation between closest ranks over a sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = pos - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
