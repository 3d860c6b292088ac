//! The fixed transactions schema and header resolution.
//!
//! The input file must carry exactly the six columns below, matched by name
//! in any order. There is no inference and no schema file: the schema is
//! compiled in, and anything missing or extra is a fatal header mismatch.

use std::fmt;
use std::path::Path;

use crate::error::LoadError;

/// Declared type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Date,
    String,
    Decimal,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Date => "date",
            ColumnType::String => "string",
            ColumnType::Decimal => "decimal",
        };
        write!(f, "{label}")
    }
}

/// One column of the fixed schema.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub datatype: ColumnType,
}

/// Schema positions, in canonical order.
pub const DATE: usize = 0;
pub const CATEGORY: usize = 1;
pub const CITY: usize = 2;
pub const PRODUCT: usize = 3;
pub const QUANTITY: usize = 4;
pub const UNIT_PRICE: usize = 5;

pub const COLUMNS: [Column; 6] = [
    Column {
        name: "date",
        datatype: ColumnType::Date,
    },
    Column {
        name: "category",
        datatype: ColumnType::String,
    },
    Column {
        name: "city",
        datatype: ColumnType::String,
    },
    Column {
        name: "product",
        datatype: ColumnType::String,
    },
    Column {
        name: "quantity",
        datatype: ColumnType::Decimal,
    },
    Column {
        name: "unit_price",
        datatype: ColumnType::Decimal,
    },
];

/// Resolved mapping from schema position to field position in the file.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    positions: [usize; COLUMNS.len()],
}

impl HeaderMap {
    /// Matches the file header against the fixed schema by name, in any
    /// column order. Every schema column must be present exactly once and
    /// no extra column is allowed.
    pub fn resolve(path: &Path, headers: &[String]) -> Result<Self, LoadError> {
        let mut positions = [0usize; COLUMNS.len()];
        let mut filled = [false; COLUMNS.len()];
        let mut unexpected = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            match COLUMNS
                .iter()
                .position(|column| names_match(header, column.name))
            {
                Some(slot) if !filled[slot] => {
                    positions[slot] = idx;
                    filled[slot] = true;
                }
                // A repeated name counts as an extra.
                _ => unexpected.push(clean_header(header).to_string()),
            }
        }
        let missing = COLUMNS
            .iter()
            .zip(filled)
            .filter(|(_, present)| !present)
            .map(|(column, _)| column.name.to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(LoadError::HeaderMismatch {
                path: path.to_path_buf(),
                missing,
                unexpected,
            });
        }
        Ok(Self { positions })
    }

    fn field<'a>(&self, fields: &'a [String], slot: usize) -> &'a str {
        &fields[self.positions[slot]]
    }

    pub fn date<'a>(&self, fields: &'a [String]) -> &'a str {
        self.field(fields, DATE)
    }

    pub fn category<'a>(&self, fields: &'a [String]) -> &'a str {
        self.field(fields, CATEGORY)
    }

    pub fn city<'a>(&self, fields: &'a [String]) -> &'a str {
        self.field(fields, CITY)
    }

    pub fn product<'a>(&self, fields: &'a [String]) -> &'a str {
        self.field(fields, PRODUCT)
    }

    pub fn quantity<'a>(&self, fields: &'a [String]) -> &'a str {
        self.field(fields, QUANTITY)
    }

    pub fn unit_price<'a>(&self, fields: &'a [String]) -> &'a str {
        self.field(fields, UNIT_PRICE)
    }
}

// A UTF-8 BOM lands inside the first header name.
fn clean_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

fn names_match(header: &str, name: &str) -> bool {
    clean_header(header).eq_ignore_ascii_case(name)
}
