//! Lot allocation engine
//!
//! Converts percentage weights into whole lots per asset without exceeding the
//! budget: floor the continuous lot estimate, then top up the most
//! under-weighted rows with the leftover cash in a single greedy pass.

use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::data::{
    AllocationOutcome, AllocationRow, AllocationSummary, RowAllocation, WeightTotal,
};
use super::error::{AllocationError, ValidationErrors};

/// Highest accepted weight total, in percent (0.09 of rounding slack)
pub const WEIGHT_TOLERANCE_LIMIT: Decimal = dec!(100.09);

/// Working state for one eligible row
#[derive(Debug, Clone)]
struct Candidate {
    /// Position in the caller's row list
    position: usize,
    weight: Decimal,
    lot_cost: Decimal,
    lots: u128,
}

impl Candidate {
    /// Never exceeds the budget, so the product always fits
    fn amount(&self) -> Decimal {
        Decimal::from_u128(self.lots)
            .and_then(|lots| lots.checked_mul(self.lot_cost))
            .unwrap_or(Decimal::MAX)
    }
}

/// Check every allocation rule, collecting all violations
///
/// Errors are reported in a fixed order: investment, incomplete rows, weight.
pub fn validate(
    total_investment: Option<Decimal>,
    rows: &[AllocationRow],
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if !total_investment.is_some_and(|t| t > Decimal::ZERO) {
        errors.push(AllocationError::InvestmentRequired);
    }

    if rows.iter().any(|row| !row.is_complete()) {
        errors.push(AllocationError::IncompleteFields);
    }

    if rounded_weight_sum(rows) > WEIGHT_TOLERANCE_LIMIT {
        errors.push(AllocationError::WeightExceeds);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}

/// Sum of all entered weights, rounded to 2 places after every addition
fn rounded_weight_sum(rows: &[AllocationRow]) -> Decimal {
    rows.iter().fold(Decimal::ZERO, |acc, row| {
        acc.saturating_add(row.weight.unwrap_or(Decimal::ZERO))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    })
}

/// Display total of the entered weights (unset weights count as 0)
pub fn weight_total(rows: &[AllocationRow]) -> WeightTotal {
    let total = rows
        .iter()
        .filter_map(|r| r.weight)
        .fold(Decimal::ZERO, |acc, w| acc.saturating_add(w));
    WeightTotal {
        total,
        is_full: (total.saturating_sub(dec!(100))).abs() < dec!(0.1),
    }
}

/// Give every row the same weight, with the rounding remainder on the last row
///
/// Each weight is `100 / n` truncated to 2 places; the last row takes whatever
/// is needed for the total to reach exactly 100.
pub fn distribute_evenly(rows: &mut [AllocationRow]) {
    let Some(count) = Decimal::from_usize(rows.len()).filter(|n| !n.is_zero()) else {
        return;
    };
    let base = (dec!(100) / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let last = dec!(100) - base * (count - Decimal::ONE);

    let len = rows.len();
    for (i, row) in rows.iter_mut().enumerate() {
        row.weight = Some(if i + 1 == len { last } else { base });
    }
    debug!("Distributed weights evenly: {} rows at {}, last {}", len, base, last);
}

/// Continuous lot estimate `budget * w / (total_w * lot_cost)`
///
/// A single division keeps exact ratios exact. When the numerator does not fit,
/// the weight share is applied first instead.
fn continuous_lots(
    budget: Decimal,
    weight: Decimal,
    total_weight: Decimal,
    lot_cost: Decimal,
) -> Decimal {
    let exact = budget
        .checked_mul(weight)
        .zip(total_weight.checked_mul(lot_cost))
        .and_then(|(numerator, denominator)| numerator.checked_div(denominator));

    exact
        .or_else(|| {
            let share = weight.checked_div(total_weight)?;
            budget.checked_mul(share)?.checked_div(lot_cost)
        })
        .unwrap_or(Decimal::ZERO)
}

/// Allocate `total_investment` across `rows` in whole lots
///
/// `total_investment` is `None` when the budget field was blank or malformed.
/// On success the outcome holds one entry per input row, in order; rows that
/// did not participate are cleared. When no row is eligible the outcome has
/// no summary.
pub fn allocate(
    total_investment: Option<Decimal>,
    rows: &[AllocationRow],
) -> Result<AllocationOutcome, ValidationErrors> {
    validate(total_investment, rows)?;
    let budget = total_investment.unwrap_or(Decimal::ZERO);

    let mut candidates: Vec<Candidate> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_complete())
        .filter_map(|(position, row)| {
            Some(Candidate {
                position,
                weight: row.weight?,
                lot_cost: row.lot_cost()?,
                lots: 0,
            })
        })
        .collect();

    let mut outcome = AllocationOutcome {
        summary: None,
        rows: rows.iter().map(|r| RowAllocation::cleared(r.id)).collect(),
    };

    if candidates.is_empty() {
        return Ok(outcome);
    }

    let total_weight: Decimal = candidates.iter().map(|c| c.weight).sum();

    for candidate in candidates.iter_mut() {
        let continuous =
            continuous_lots(budget, candidate.weight, total_weight, candidate.lot_cost);
        candidate.lots = continuous.floor().to_u128().unwrap_or(0);
    }

    let current_total: Decimal = candidates.iter().map(Candidate::amount).sum();
    let mut remaining_budget = budget - current_total;
    debug!(
        "Floor allocation: {} rows, invested {} of {}, {} left",
        candidates.len(),
        current_total,
        budget,
        remaining_budget
    );

    // Deviation from target weight, positive when under-allocated
    let deviations: Vec<Decimal> = candidates
        .iter()
        .map(|c| {
            let target = c.weight / total_weight;
            let achieved = if current_total.is_zero() {
                Decimal::ZERO
            } else {
                c.amount().checked_div(current_total).unwrap_or(Decimal::ZERO)
            };
            target - achieved
        })
        .collect();

    // Stable sort: ties keep the caller's row order
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| deviations[b].cmp(&deviations[a]));

    // Single pass, at most one extra lot per row
    for idx in order {
        let candidate = &mut candidates[idx];
        if candidate.lot_cost <= remaining_budget {
            candidate.lots += 1;
            remaining_budget -= candidate.lot_cost;
            debug!(
                "Top-up: row {} +1 lot ({}), {} left",
                rows[candidate.position].id, candidate.lot_cost, remaining_budget
            );
        }
    }

    for candidate in &candidates {
        let entry = &mut outcome.rows[candidate.position];
        entry.lots = Some(candidate.lots);
        entry.sum = Some(candidate.amount());
    }

    outcome.summary = Some(AllocationSummary::from_sums(
        budget,
        candidates.iter().map(Candidate::amount),
    ));

    Ok(outcome)
}
