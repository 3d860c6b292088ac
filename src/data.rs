use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One transaction as loaded: `date` still text, `quantity` possibly blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub date: String,
    pub category: String,
    pub city: String,
    pub product: String,
    pub quantity: Option<Decimal>,
    pub unit_price: Decimal,
}

/// The loaded table, in file order. Consumed by the cleaner.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One cleaned transaction: typed date, quantity never missing, and the
/// derived `total_sales = quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub category: String,
    pub city: String,
    pub product: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_sales: Decimal,
}

/// The cleaned table; immutable once the cleaner returns it.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    pub records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of `total_sales` over every row. Exact, no float drift.
    pub fn total_revenue(&self) -> Decimal {
        self.records
            .iter()
            .map(|record| record.total_sales)
            .sum::<Decimal>()
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

/// Parses a numeric cell exactly. Accepts plain and scientific notation.
pub fn parse_decimal(value: &str) -> Result<Decimal> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| anyhow!("'{value}' is not a number"))
}

/// Monetary display with two decimals and the console currency mark.
pub fn format_money(value: Decimal) -> String {
    format!("\u{20B9}{value:.2}")
}

/// Quantity display without trailing zeros (`2.50` renders as `2.5`).
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}
