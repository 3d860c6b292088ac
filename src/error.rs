use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures while reading and typing the input file. All variants are fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: input is not valid UTF-8", .path.display())]
    Decode { path: PathBuf },

    #[error(
        "{}: header mismatch: missing [{}], unexpected [{}]",
        .path.display(),
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    HeaderMismatch {
        path: PathBuf,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("{} row {row}, column '{column}': {reason}", .path.display())]
    Field {
        path: PathBuf,
        row: usize,
        column: String,
        reason: String,
    },
}

/// Failures during cleaning. Any one aborts the whole run; there is no
/// partial-success mode. Rows are 1-based file lines, counting the header
/// as line 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("row {row}: cannot parse '{value}' as a date")]
    Date { row: usize, value: String },

    #[error("row {row}: total_sales overflows ({quantity} \u{00D7} {unit_price})")]
    TotalOverflow {
        row: usize,
        quantity: Decimal,
        unit_price: Decimal,
    },

    #[error("row {row}: revenue total overflows")]
    RevenueOverflow { row: usize },
}

/// Failures while drawing the dashboard or writing the image file.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to render dashboard {}: {message}", .path.display())]
    Draw { path: PathBuf, message: String },

    #[error("failed to write dashboard {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

/// Umbrella over the three stage error categories.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
