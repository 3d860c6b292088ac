use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Analyze e-commerce sales CSV data and render a dashboard",
    long_about = None
)]
pub struct Cli {
    /// Input CSV file with sales transactions
    #[arg(short = 'i', long = "input", default_value = "data/sales_data.csv")]
    pub input: PathBuf,
    /// Destination PNG file for the dashboard
    #[arg(
        short = 'o',
        long = "output",
        default_value = "sales_analysis_dashboard.png"
    )]
    pub output: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|'); inferred from
    /// the file extension when omitted
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Number of bins in the unit-price histogram panel
    #[arg(long, default_value_t = 8)]
    pub bins: usize,
    /// Skip dashboard rendering and produce console output only
    #[arg(long = "no-chart")]
    pub no_chart: bool,
    /// Maximum rows to load (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
