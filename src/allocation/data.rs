//! Allocation rows, per-row results, and the run summary

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One candidate asset position
///
/// Numeric fields are `None` while unset (blank or unparsable in the form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Stable identity within a session
    pub id: u64,

    /// Display label, also the key for quote lookups
    #[serde(default)]
    pub ticker: Option<String>,

    /// Unit price
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Target weight in percent (0-100)
    #[serde(default)]
    pub weight: Option<Decimal>,

    /// Units per lot
    #[serde(default)]
    pub lot_size: Option<u32>,
}

impl AllocationRow {
    /// Create an empty row
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ticker: None,
            price: None,
            weight: None,
            lot_size: None,
        }
    }

    /// Create a fully specified row
    pub fn with_values(id: u64, price: Decimal, weight: Decimal, lot_size: u32) -> Self {
        Self {
            id,
            ticker: None,
            price: Some(price),
            weight: Some(weight),
            lot_size: Some(lot_size),
        }
    }

    pub fn ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// A row participates only when price, weight and lot size are all positive
    /// and the lot cost is representable
    pub fn is_complete(&self) -> bool {
        self.price.is_some_and(|p| p > Decimal::ZERO)
            && self.weight.is_some_and(|w| w > Decimal::ZERO)
            && self.lot_size.is_some_and(|l| l > 0)
            && self.lot_cost().is_some()
    }

    /// Cost of one lot (lot_size * price), if both are set and the product fits
    pub fn lot_cost(&self) -> Option<Decimal> {
        Decimal::from(self.lot_size?).checked_mul(self.price?)
    }
}

/// Result for one input row; `None` fields are cleared (unset), not zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAllocation {
    pub id: u64,
    pub lots: Option<u128>,
    pub sum: Option<Decimal>,
}

impl RowAllocation {
    pub fn cleared(id: u64) -> Self {
        Self { id, lots: None, sum: None }
    }
}

/// Totals for a successful allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub total_budget: Decimal,
    pub total_invested: Decimal,
    pub remaining: Decimal,
    /// Invested share of the budget, in percent
    pub utilization: Decimal,
}

impl AllocationSummary {
    /// Build the summary from the final per-row sums
    pub fn from_sums<I>(total_budget: Decimal, sums: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let total_invested = sums
            .into_iter()
            .fold(Decimal::ZERO, |acc, sum| acc.saturating_add(sum));
        let utilization = total_invested
            .checked_div(total_budget)
            .and_then(|share| share.checked_mul(dec!(100)))
            .unwrap_or(Decimal::ZERO);

        Self {
            total_budget,
            total_invested,
            remaining: total_budget.saturating_sub(total_invested),
            utilization,
        }
    }
}

/// Output of an allocation run: one entry per input row, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// `None` when no row was eligible (nothing was allocated)
    pub summary: Option<AllocationSummary>,
    pub rows: Vec<RowAllocation>,
}

impl AllocationOutcome {
    /// Look up the result for a row id
    pub fn row(&self, id: u64) -> Option<&RowAllocation> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// Display total of the entered weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightTotal {
    pub total: Decimal,
    /// Within 0.1 of 100, shown as a clean "100"
    pub is_full: bool,
}

impl WeightTotal {
    pub fn display(&self) -> String {
        if self.is_full {
            "100".to_string()
        } else {
            format!("{:.2}", self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_completeness() {
        assert!(AllocationRow::with_values(1, dec!(10), dec!(50), 1).is_complete());
        assert!(!AllocationRow::new(1).is_complete());
        assert!(!AllocationRow::with_values(1, dec!(0), dec!(50), 1).is_complete());
        assert!(!AllocationRow::with_values(1, dec!(10), dec!(-5), 1).is_complete());
        assert!(!AllocationRow::with_values(1, dec!(10), dec!(50), 0).is_complete());
    }

    #[test]
    fn test_lot_cost() {
        let row = AllocationRow::with_values(1, dec!(12.5), dec!(10), 10);
        assert_eq!(row.lot_cost(), Some(dec!(125)));
        assert_eq!(AllocationRow::new(2).lot_cost(), None);
    }

    #[test]
    fn test_unrepresentable_lot_cost_is_incomplete() {
        let price = dec!(100000000000000000000);
        let row = AllocationRow::with_values(1, price, dec!(50), 1_000_000_000);
        assert_eq!(row.lot_cost(), None);
        assert!(!row.is_complete());
    }

    #[test]
    fn test_summary_from_sums() {
        let summary = AllocationSummary::from_sums(dec!(1000), [dec!(600), dec!(350)]);
        assert_eq!(summary.total_invested, dec!(950));
        assert_eq!(summary.remaining, dec!(50));
        assert_eq!(summary.utilization, dec!(95));

        let empty = AllocationSummary::from_sums(Decimal::ZERO, []);
        assert_eq!(empty.utilization, Decimal::ZERO);
    }

    #[test]
    fn test_weight_total_display() {
        let full = WeightTotal { total: dec!(99.95), is_full: true };
        assert_eq!(full.display(), "100");
        let partial = WeightTotal { total: dec!(72.5), is_full: false };
        assert_eq!(partial.display(), "72.50");
    }
}
