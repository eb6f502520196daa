//! Load a manually edited contribution schedule from CSV
//!
//! One period per record, in order, with an `amount` column. Blank or
//! malformed amounts count as 0, matching how the form treats empty cells.

use crate::allocation::LoadError;
use crate::parse::parse_or_zero;
use super::ContributionSchedule;
use csv::{ReaderBuilder, Trim};
use std::path::Path;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    amount: String,
}

/// Load a manual schedule from a CSV file
pub fn load_amounts<P: AsRef<Path>>(path: P) -> Result<ContributionSchedule, LoadError> {
    let file = std::fs::File::open(path)?;
    load_amounts_from_reader(file)
}

/// Load a manual schedule from any reader
pub fn load_amounts_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<ContributionSchedule, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut amounts = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        amounts.push(parse_or_zero(&row.amount));
    }

    Ok(ContributionSchedule::manual(amounts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_amounts() {
        let data = "period,amount\n1,100\n2,\n3,250.5\n";
        let schedule = load_amounts_from_reader(data.as_bytes()).unwrap();
        assert!(schedule.is_manual());
        assert_eq!(schedule.amounts(), vec![100.0, 0.0, 250.5]);
    }
}
