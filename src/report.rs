use rust_decimal::Decimal;

use crate::{
    aggregate::Aggregates,
    clean::CleanReport,
    data::{RawTable, SalesTable, format_money, format_quantity},
    inspect::Inspection,
    schema,
    table::{Align, print_table},
};

const RULE_WIDTH: usize = 60;
/// Dataset dumps are capped so a large input does not flood the console.
const MAX_DUMP_ROWS: usize = 30;

const RAW_ALIGNS: [Align; 6] = [
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
];
const CLEAN_ALIGNS: [Align; 7] = [
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
];

fn section(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn elide(total: usize) {
    if total > MAX_DUMP_ROWS {
        println!("... {} more row(s)", total - MAX_DUMP_ROWS);
    }
}

fn schema_headers() -> Vec<String> {
    schema::COLUMNS
        .iter()
        .map(|column| column.name.to_string())
        .collect()
}

pub fn print_original_dataset(table: &RawTable) {
    section("ORIGINAL DATASET");
    let rows = table
        .records
        .iter()
        .take(MAX_DUMP_ROWS)
        .map(|record| {
            vec![
                record.date.clone(),
                record.category.clone(),
                record.city.clone(),
                record.product.clone(),
                record.quantity.map(format_quantity).unwrap_or_default(),
                record.unit_price.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&schema_headers(), &rows, &RAW_ALIGNS);
    elide(table.len());
}

pub fn print_inspection(inspection: &Inspection) {
    section("DATA INSPECTION");
    println!();
    println!(
        "Dataset shape: {} row(s) x {} column(s)",
        inspection.rows, inspection.columns
    );
    println!();
    println!("Column overview:");
    let headers = vec![
        "column".to_string(),
        "type".to_string(),
        "missing".to_string(),
    ];
    let rows = inspection
        .profiles
        .iter()
        .map(|profile| {
            vec![
                profile.name.to_string(),
                profile.datatype.to_string(),
                profile.missing.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&headers, &rows, &[Align::Left, Align::Left, Align::Right]);

    if !inspection.numeric.is_empty() {
        println!();
        println!("Numeric summary:");
        let headers = ["column", "count", "min", "max", "mean", "p25", "median", "p75"]
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        let rows = inspection
            .numeric
            .iter()
            .map(|summary| {
                vec![
                    summary.name.to_string(),
                    summary.count.to_string(),
                    format_metric(summary.min),
                    format_metric(summary.max),
                    format_metric(summary.mean),
                    format_metric(summary.p25),
                    format_metric(summary.median),
                    format_metric(summary.p75),
                ]
            })
            .collect::<Vec<_>>();
        let aligns = [
            Align::Left,
            Align::Right,
            Align::Right,
            Align::Right,
            Align::Right,
            Align::Right,
            Align::Right,
            Align::Right,
        ];
        print_table(&headers, &rows, &aligns);
    }
}

pub fn print_cleaning(report: &CleanReport, cleaned: &SalesTable) {
    section("DATA CLEANING");
    println!();
    println!("Converted 'date' column to calendar dates");
    println!("Missing values in 'quantity': {}", report.imputed_rows);
    if report.imputed_rows > 0 {
        println!(
            "  - Filled with median value: {}",
            format_quantity(report.median_quantity)
        );
    }
    println!("Duplicate rows found: {}", report.duplicates_dropped);
    if report.duplicates_dropped > 0 {
        println!("  - Duplicates removed");
    }
    println!(
        "Created 'total_sales' column (quantity \u{00D7} unit_price) for {} row(s)",
        cleaned.len()
    );
}

pub fn print_cleaned_dataset(table: &SalesTable) {
    section("CLEANED DATASET");
    let mut headers = schema_headers();
    headers.push("total_sales".to_string());
    let rows = table
        .records
        .iter()
        .take(MAX_DUMP_ROWS)
        .map(|record| {
            vec![
                record.date.format("%Y-%m-%d").to_string(),
                record.category.clone(),
                record.city.clone(),
                record.product.clone(),
                format_quantity(record.quantity),
                record.unit_price.to_string(),
                format!("{:.2}", record.total_sales),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&headers, &rows, &CLEAN_ALIGNS);
    elide(table.len());
    println!();
    println!(
        "Final shape: {} row(s) x {} column(s)",
        table.len(),
        schema::COLUMNS.len() + 1
    );
}

pub fn print_analysis(aggregates: &Aggregates) {
    section("DATA ANALYSIS");
    println!();
    println!("Total Sales by Category:");
    revenue_table("category", &aggregates.category_revenue);
    println!();
    println!("Total Sales by City:");
    revenue_table("city", &aggregates.city_revenue);
    println!();
    println!("Top Selling Products:");
    revenue_table("product", &aggregates.product_revenue);
    println!();
    println!("Daily Sales Trend:");
    let headers = vec!["date".to_string(), "total_sales".to_string()];
    let rows = aggregates
        .daily_revenue
        .iter()
        .map(|(date, sum)| {
            vec![date.format("%Y-%m-%d").to_string(), format!("{sum:.2}")]
        })
        .collect::<Vec<_>>();
    print_table(&headers, &rows, &[Align::Left, Align::Right]);
}

fn revenue_table(key_name: &str, ranking: &[(String, Decimal)]) {
    let headers = vec![key_name.to_string(), "total_sales".to_string()];
    let rows = ranking
        .iter()
        .map(|(key, sum)| vec![key.clone(), format!("{sum:.2}")])
        .collect::<Vec<_>>();
    print_table(&headers, &rows, &[Align::Left, Align::Right]);
}

/// Headline figures for the final console section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insights {
    pub total_revenue: Decimal,
    pub transactions: usize,
    pub top_category: Option<(String, Decimal)>,
    pub top_city: Option<(String, Decimal)>,
    pub top_product: Option<(String, Decimal)>,
    pub average_transaction: Decimal,
}

pub fn compute_insights(table: &SalesTable, aggregates: &Aggregates) -> Insights {
    let total_revenue = table.total_revenue();
    let transactions = table.len();
    let average_transaction = if transactions == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(transactions)
    };
    Insights {
        total_revenue,
        transactions,
        top_category: aggregates.category_revenue.first().cloned(),
        top_city: aggregates.city_revenue.first().cloned(),
        top_product: aggregates.product_revenue.first().cloned(),
        average_transaction,
    }
}

pub fn print_insights(insights: &Insights) {
    section("KEY INSIGHTS");
    println!();
    println!("Total Revenue: {}", format_money(insights.total_revenue));
    println!("Total Transactions: {}", insights.transactions);
    if let Some((category, revenue)) = &insights.top_category {
        println!(
            "Best Selling Category: {category} ({})",
            format_money(*revenue)
        );
    }
    if let Some((city, revenue)) = &insights.top_city {
        println!("Top City: {city} ({})", format_money(*revenue));
    }
    if let Some((product, revenue)) = &insights.top_product {
        println!(
            "Most Popular Product: {product} ({})",
            format_money(*revenue)
        );
    }
    println!(
        "Average Transaction Value: {}",
        format_money(insights.average_transaction)
    );
}

// Integers print bare; anything fractional keeps 4 digits.
fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}
