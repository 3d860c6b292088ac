use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::data::{SalesRecord, SalesTable};

/// All aggregates the reporter and dashboard consume. Computed fresh from
/// the cleaned table and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    /// Revenue per category, descending by sum, ties in first-seen order.
    pub category_revenue: Vec<(String, Decimal)>,
    /// Revenue per city, same ordering rules.
    pub city_revenue: Vec<(String, Decimal)>,
    /// Revenue per product, same ordering rules.
    pub product_revenue: Vec<(String, Decimal)>,
    /// Daily revenue in ascending date order; same-date rows are merged.
    pub daily_revenue: Vec<(NaiveDate, Decimal)>,
    /// Transaction counts per category, descending, ties first-seen.
    pub category_transactions: Vec<(String, usize)>,
}

/// Pure function of the cleaned table: four key→sum reductions plus the
/// per-category transaction counts the pie panel consumes.
pub fn aggregate(table: &SalesTable) -> Aggregates {
    Aggregates {
        category_revenue: ranked_revenue(table, |record| record.category.as_str()),
        city_revenue: ranked_revenue(table, |record| record.city.as_str()),
        product_revenue: ranked_revenue(table, |record| record.product.as_str()),
        daily_revenue: daily_revenue(table),
        category_transactions: ranked_counts(table, |record| record.category.as_str()),
    }
}

fn ranked_revenue<'a, F>(table: &'a SalesTable, key: F) -> Vec<(String, Decimal)>
where
    F: Fn(&'a SalesRecord) -> &'a str,
{
    let mut order = Vec::new();
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    for record in &table.records {
        let key = key(record);
        match sums.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record.total_sales);
                order.push(key);
            }
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += record.total_sales;
            }
        }
    }
    let mut ranked = order
        .into_iter()
        .map(|key| (key.to_string(), sums[key]))
        .collect::<Vec<_>>();
    // Stable sort keeps first-seen order for equal sums.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn ranked_counts<'a, F>(table: &'a SalesTable, key: F) -> Vec<(String, usize)>
where
    F: Fn(&'a SalesRecord) -> &'a str,
{
    let mut order = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in &table.records {
        let key = key(record);
        match counts.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(1);
                order.push(key);
            }
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += 1;
            }
        }
    }
    let mut ranked = order
        .into_iter()
        .map(|key| (key.to_string(), counts[key]))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn daily_revenue(table: &SalesTable) -> Vec<(NaiveDate, Decimal)> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in &table.records {
        *by_date.entry(record.date).or_insert(Decimal::ZERO) += record.total_sales;
    }
    by_date.into_iter().collect()
}
