use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use itertools::{Itertools, MinMaxResult};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{aggregate::Aggregates, data::SalesTable, error::RenderError};

pub const DASHBOARD_WIDTH: u32 = 1600;
pub const DASHBOARD_HEIGHT: u32 = 1000;

const PANEL_TITLE_FONT: (&str, u32) = ("sans-serif", 18);

const CATEGORY_PALETTE: [RGBColor; 2] = [RGBColor(255, 107, 107), RGBColor(78, 205, 196)];
const CITY_PALETTE: [RGBColor; 4] = [
    RGBColor(149, 225, 211),
    RGBColor(243, 129, 129),
    RGBColor(170, 150, 218),
    RGBColor(252, 186, 211),
];
const PRODUCT_PALETTE: [RGBColor; 4] = [
    RGBColor(168, 230, 207),
    RGBColor(255, 211, 182),
    RGBColor(255, 170, 165),
    RGBColor(255, 139, 148),
];
const PIE_PALETTE: [RGBColor; 2] = [RGBColor(255, 107, 107), RGBColor(78, 205, 196)];
const HISTOGRAM_FILL: RGBColor = RGBColor(255, 160, 122);
const TREND_LINE: RGBColor = RGBColor(255, 107, 107);
const TREND_MARKER: RGBColor = RGBColor(255, 217, 61);

/// Renders the full dashboard to `path`. Draw failures and write failures
/// are reported separately so the caller can tell a bad chart from a bad
/// output location.
pub fn render_dashboard(
    table: &SalesTable,
    aggregates: &Aggregates,
    path: &Path,
    bins: usize,
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, (DASHBOARD_WIDTH, DASHBOARD_HEIGHT)).into_drawing_area();
    draw_panels(&root, table, aggregates, bins).map_err(|err| RenderError::Draw {
        path: path.to_path_buf(),
        message: format!("{err:#}"),
    })?;
    root.present().map_err(|err| RenderError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    info!("dashboard saved to {}", path.display());
    Ok(())
}

fn draw_panels(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    table: &SalesTable,
    aggregates: &Aggregates,
    bins: usize,
) -> Result<()> {
    root.fill(&WHITE)?;
    let canvas = root.titled("E-Commerce Sales Data Analysis Dashboard", ("sans-serif", 26))?;
    let panels = canvas.split_evenly((2, 3));
    draw_revenue_bars(
        &panels[0],
        "Total Sales by Category",
        &aggregates.category_revenue,
        &CATEGORY_PALETTE,
        true,
    )?;
    draw_revenue_bars(
        &panels[1],
        "Total Sales by City",
        &aggregates.city_revenue,
        &CITY_PALETTE,
        true,
    )?;
    draw_price_histogram(&panels[2], table, bins)?;
    draw_daily_trend(&panels[3], &aggregates.daily_revenue)?;
    draw_product_bars(&panels[4], &aggregates.product_revenue)?;
    draw_transaction_pie(&panels[5], &aggregates.category_transactions)?;
    Ok(())
}

fn draw_revenue_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    ranking: &[(String, Decimal)],
    palette: &'static [RGBColor],
    with_value_labels: bool,
) -> Result<()> {
    if ranking.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = ranking.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<f64> = ranking
        .iter()
        .map(|(_, sum)| sum.to_f64().unwrap_or(0.0))
        .collect();
    let y_max = pad_max(values.iter().copied().fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption(title, PANEL_TITLE_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d((0..names.len()).into_segmented(), 0f64..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_label_formatter(&|segment| segment_label(segment, &names))
        .y_label_formatter(&|value: &f64| format!("{value:.0}"))
        .y_desc("Total Sales (INR)")
        .draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style_func(|segment, _| palette[segment_index(segment) % palette.len()].filled())
            .margin(20)
            .data(values.iter().enumerate().map(|(idx, value)| (idx, *value))),
    )?;

    if with_value_labels {
        let label_style = ("sans-serif", 13)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(values.iter().enumerate().map(|(idx, value)| {
            Text::new(
                format!("{value:.0}"),
                (SegmentValue::CenterOf(idx), *value),
                label_style.clone(),
            )
        }))?;
    }
    Ok(())
}

fn draw_price_histogram(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    table: &SalesTable,
    bins: usize,
) -> Result<()> {
    let prices: Vec<f64> = table
        .records
        .iter()
        .map(|record| record.unit_price.to_f64().unwrap_or(0.0))
        .collect();
    let (min, max) = match prices.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return Ok(()),
        MinMaxResult::OneElement(only) => (only, only),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let bins = bins.max(1);
    let span = max - min;
    let width = if span <= 0.0 { 1.0 } else { span / bins as f64 };
    let mut counts = vec![0usize; bins];
    for price in &prices {
        let mut slot = ((price - min) / width) as usize;
        if slot >= bins {
            slot = bins - 1;
        }
        counts[slot] += 1;
    }
    let y_max = pad_max(counts.iter().copied().max().unwrap_or(0) as f64);

    let mut chart = ChartBuilder::on(area)
        .caption("Distribution of Unit Prices", PANEL_TITLE_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d((0..bins).into_segmented(), 0f64..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_label_formatter(&|segment| bin_label(segment, min, width))
        .y_label_formatter(&|count: &f64| format!("{count:.0}"))
        .x_desc("Unit Price (INR)")
        .y_desc("Frequency")
        .draw()?;
    chart.draw_series(
        Histogram::vertical(&chart)
            .style(HISTOGRAM_FILL.filled())
            .margin(2)
            .data(counts.iter().enumerate().map(|(idx, count)| (idx, *count as f64))),
    )?;
    Ok(())
}

fn draw_daily_trend(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    daily: &[(NaiveDate, Decimal)],
) -> Result<()> {
    if daily.is_empty() {
        return Ok(());
    }
    let points: Vec<(usize, f64)> = daily
        .iter()
        .enumerate()
        .map(|(idx, (_, sum))| (idx, sum.to_f64().unwrap_or(0.0)))
        .collect();
    let date_format = trend_date_format(daily);
    let labels: Vec<String> = daily
        .iter()
        .map(|(date, _)| date.format(date_format).to_string())
        .collect();
    let y_max = pad_max(points.iter().map(|(_, value)| *value).fold(0.0, f64::max));
    let x_max = (daily.len() - 1).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption("Daily Sales Trend", PANEL_TITLE_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(0..x_max, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_label_formatter(&|idx: &usize| labels.get(*idx).cloned().unwrap_or_default())
        .y_label_formatter(&|value: &f64| format!("{value:.0}"))
        .x_labels(labels.len().min(10))
        .x_desc("Date")
        .y_desc("Total Sales (INR)")
        .draw()?;

    chart.draw_series(
        AreaSeries::new(points.clone(), 0.0, TREND_LINE.mix(0.3))
            .border_style(TREND_LINE.stroke_width(2)),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|point| Circle::new(*point, 4, TREND_MARKER.filled())),
    )?;
    Ok(())
}

fn draw_product_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    ranking: &[(String, Decimal)],
) -> Result<()> {
    if ranking.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = ranking.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<f64> = ranking
        .iter()
        .map(|(_, sum)| sum.to_f64().unwrap_or(0.0))
        .collect();
    let x_max = pad_max(values.iter().copied().fold(0.0, f64::max));

    let mut chart = ChartBuilder::on(area)
        .caption("Sales by Product", PANEL_TITLE_FONT)
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max, (0..names.len()).into_segmented())?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|segment| segment_label(segment, &names))
        .x_label_formatter(&|value: &f64| format!("{value:.0}"))
        .x_desc("Total Sales (INR)")
        .draw()?;
    chart.draw_series(
        Histogram::horizontal(&chart)
            .style_func(|segment, _| {
                PRODUCT_PALETTE[segment_index(segment) % PRODUCT_PALETTE.len()].filled()
            })
            .margin(10)
            .data(values.iter().enumerate().map(|(idx, value)| (idx, *value))),
    )?;

    let label_style = ("sans-serif", 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(values.iter().enumerate().map(|(idx, value)| {
        Text::new(
            format!("{value:.0}"),
            (*value, SegmentValue::CenterOf(idx)),
            label_style.clone(),
        )
    }))?;
    Ok(())
}

fn draw_transaction_pie(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    counts: &[(String, usize)],
) -> Result<()> {
    if counts.is_empty() {
        return Ok(());
    }
    let child = area.titled("Transaction Distribution by Category", PANEL_TITLE_FONT)?;
    let sizes: Vec<f64> = counts.iter().map(|(_, count)| *count as f64).collect();
    let labels: Vec<String> = counts.iter().map(|(name, _)| name.clone()).collect();
    let colors: Vec<RGBColor> = counts
        .iter()
        .enumerate()
        .map(|(idx, _)| PIE_PALETTE[idx % PIE_PALETTE.len()])
        .collect();
    let (width, height) = child.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.32;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.percentages(("sans-serif", 15).into_font().color(&WHITE));
    pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
    child.draw(&pie)?;
    Ok(())
}

fn segment_index(segment: &SegmentValue<usize>) -> usize {
    match segment {
        SegmentValue::Exact(idx) | SegmentValue::CenterOf(idx) => *idx,
        SegmentValue::Last => 0,
    }
}

fn segment_label(segment: &SegmentValue<usize>, names: &[&str]) -> String {
    match segment {
        SegmentValue::Exact(idx) | SegmentValue::CenterOf(idx) => names
            .get(*idx)
            .map(|name| (*name).to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

// Compact ticks within a single year; longer spans need the year.
fn trend_date_format(daily: &[(NaiveDate, Decimal)]) -> &'static str {
    let spans_years = daily
        .first()
        .zip(daily.last())
        .is_some_and(|(first, last)| first.0.year() != last.0.year());
    if spans_years { "%Y-%m-%d" } else { "%m-%d" }
}

// Bins are labelled by their midpoint; edges land between ticks.
fn bin_label(segment: &SegmentValue<usize>, min: f64, width: f64) -> String {
    match segment {
        SegmentValue::Exact(idx) | SegmentValue::CenterOf(idx) => {
            format!("{:.0}", min + width * (*idx as f64 + 0.5))
        }
        SegmentValue::Last => String::new(),
    }
}

// Axis headroom above the tallest bar; keeps a degenerate axis out of
// all-zero panels.
fn pad_max(max: f64) -> f64 {
    if max <= 0.0 { 1.0 } else { max * 1.15 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::data::SalesRecord;
    use rust_decimal::dec;
    use tempfile::tempdir;

    fn sample_table() -> SalesTable {
        SalesTable {
            records: vec![
                SalesRecord {
                    date: "2024-01-01".parse().unwrap(),
                    category: "Electronics".to_string(),
                    city: "Pune".to_string(),
                    product: "Phone".to_string(),
                    quantity: dec!(2),
                    unit_price: dec!(500),
                    total_sales: dec!(1000),
                },
                SalesRecord {
                    date: "2024-01-02".parse().unwrap(),
                    category: "Clothing".to_string(),
                    city: "Mumbai".to_string(),
                    product: "Shirt".to_string(),
                    quantity: dec!(2),
                    unit_price: dec!(200),
                    total_sales: dec!(400),
                },
            ],
        }
    }

    #[test]
    fn render_dashboard_writes_png() {
        let table = sample_table();
        let aggregates = aggregate(&table);
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.png");
        render_dashboard(&table, &aggregates, &path, 8).unwrap();
        let written = std::fs::metadata(&path).unwrap().len();
        assert!(written > 0);
    }

    #[test]
    fn render_dashboard_handles_empty_table() {
        let table = SalesTable::default();
        let aggregates = aggregate(&table);
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");
        render_dashboard(&table, &aggregates, &path, 8).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn render_dashboard_cycles_palettes_past_their_length() {
        let names = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
        let records = names
            .iter()
            .enumerate()
            .map(|(idx, name)| SalesRecord {
                date: format!("2024-01-{:02}", idx + 1).parse().unwrap(),
                category: format!("Cat {name}"),
                city: format!("City {name}"),
                product: format!("Item {name}"),
                quantity: dec!(1),
                unit_price: Decimal::from(100 * (idx as i64 + 1)),
                total_sales: Decimal::from(100 * (idx as i64 + 1)),
            })
            .collect::<Vec<_>>();
        let table = SalesTable { records };
        let aggregates = aggregate(&table);
        let dir = tempdir().unwrap();
        let path = dir.path().join("many_keys.png");
        render_dashboard(&table, &aggregates, &path, 8).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn trend_ticks_add_the_year_only_across_years() {
        let one_year = vec![
            ("2024-01-05".parse().unwrap(), dec!(100)),
            ("2024-11-20".parse().unwrap(), dec!(250)),
        ];
        assert_eq!(trend_date_format(&one_year), "%m-%d");

        let two_years = vec![
            ("2023-12-30".parse().unwrap(), dec!(100)),
            ("2024-01-02".parse().unwrap(), dec!(250)),
        ];
        assert_eq!(trend_date_format(&two_years), "%Y-%m-%d");
    }

    #[test]
    fn pad_max_gives_headroom() {
        assert_eq!(pad_max(0.0), 1.0);
        assert!((pad_max(100.0) - 115.0).abs() < 1e-9);
    }
}
