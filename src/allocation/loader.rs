//! Load allocation rows from CSV
//!
//! Expected columns: `ticker,price,weight,lot_size`. Blank or malformed cells
//! load as unset so the row is reported as incomplete rather than rejected.

use super::AllocationRow;
use crate::parse::{parse_decimal, parse_lot_size};
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a CSV input
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Raw CSV row; every column is optional text
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    ticker: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    weight: String,
    #[serde(default)]
    lot_size: String,
}

impl CsvRow {
    fn to_row(self, id: u64) -> AllocationRow {
        let ticker = self.ticker.trim();
        AllocationRow {
            id,
            ticker: (!ticker.is_empty()).then(|| ticker.to_string()),
            price: parse_decimal(&self.price),
            weight: parse_decimal(&self.weight),
            lot_size: parse_lot_size(&self.lot_size),
        }
    }
}

/// Load rows from a CSV file; ids are assigned 1.. in file order
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<AllocationRow>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_rows_from_reader(file)
}

/// Load rows from any reader (e.g., string buffer, stdin)
pub fn load_rows_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<AllocationRow>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let raw: CsvRow = result?;
        rows.push(raw.to_row(index as u64 + 1));
    }

    Ok(rows)
}
