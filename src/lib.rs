pub mod aggregate;
pub mod chart;
pub mod clean;
pub mod cli;
pub mod data;
pub mod error;
pub mod inspect;
pub mod io_utils;
pub mod load;
pub mod report;
pub mod schema;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::{cli::Cli, error::PipelineError};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("salescope", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    execute(&cli)?;
    Ok(())
}

/// Runs the whole pipeline for one invocation: load, inspect, clean,
/// aggregate, report, chart. The first failing stage aborts the run.
pub fn execute(cli: &Cli) -> Result<(), PipelineError> {
    let delimiter = io_utils::resolve_input_delimiter(&cli.input, cli.delimiter);
    info!(
        "Analyzing '{}' with delimiter '{}'",
        cli.input.display(),
        printable_delimiter(delimiter)
    );

    let raw = load::load_table(&cli.input, delimiter, cli.limit)?;
    report::print_original_dataset(&raw);

    let inspection = inspect::inspect(&raw);
    report::print_inspection(&inspection);

    let (cleaned, summary) = clean::clean(raw)?;
    report::print_cleaning(&summary, &cleaned);
    report::print_cleaned_dataset(&cleaned);

    let aggregates = aggregate::aggregate(&cleaned);
    report::print_analysis(&aggregates);

    if !cli.no_chart {
        chart::render_dashboard(&cleaned, &aggregates, &cli.output, cli.bins)?;
    }

    let insights = report::compute_insights(&cleaned, &aggregates);
    report::print_insights(&insights);
    info!("analysis complete");
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
