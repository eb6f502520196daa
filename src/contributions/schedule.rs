//! Contribution schedule generation and manual editing

use crate::horizon::{ContributionFrequency, Horizon, MONTHS_PER_YEAR};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One scheduled periodic contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionPeriod {
    /// 0-based period ordinal (year or month, depending on frequency)
    pub index: usize,
    pub amount: f64,
}

/// Inputs that drive automatic schedule generation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleParams {
    /// Contribution amount for the first period
    pub base_amount: f64,
    /// Annual indexation as a decimal (0.05 = 5% per year)
    #[serde(default)]
    pub growth_rate: f64,
    pub horizon: Horizon,
    pub frequency: ContributionFrequency,
}

impl ScheduleParams {
    pub fn new(
        base_amount: f64,
        growth_rate: f64,
        horizon: Horizon,
        frequency: ContributionFrequency,
    ) -> Self {
        Self {
            base_amount,
            growth_rate,
            horizon,
            frequency,
        }
    }
}

/// Round to whole cents
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Generate the indexed contribution series
///
/// Yearly schedules index every row; monthly schedules index only at each
/// 12-row boundary, so all months of a year share one amount.
pub fn generate(params: &ScheduleParams) -> Vec<ContributionPeriod> {
    let count = params.horizon.contribution_count(params.frequency) as usize;
    let base = params.base_amount.max(0.0);
    let growth = 1.0 + params.growth_rate;

    (0..count)
        .map(|index| {
            let exponent = match params.frequency {
                ContributionFrequency::Yearly => index,
                ContributionFrequency::Monthly => index / MONTHS_PER_YEAR as usize,
            };
            ContributionPeriod {
                index,
                amount: round_cents(base * growth.powi(exponent as i32)),
            }
        })
        .collect()
}

/// Errors from manual schedule edits
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Schedule is auto-generated; switch to manual mode to edit it")]
    NotManual,

    #[error("Period {index} is out of range (schedule has {len} periods)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A contribution schedule that is either generated or owned by the user
///
/// Only `Auto` schedules respond to `regenerate`; once switched to `Manual`
/// the periods change only through explicit edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ContributionSchedule {
    Auto {
        params: ScheduleParams,
        periods: Vec<ContributionPeriod>,
    },
    Manual {
        periods: Vec<ContributionPeriod>,
    },
}

impl Default for ContributionSchedule {
    fn default() -> Self {
        Self::auto(ScheduleParams::default())
    }
}

impl ContributionSchedule {
    /// Generate a fresh auto schedule
    pub fn auto(params: ScheduleParams) -> Self {
        Self::Auto {
            params,
            periods: generate(&params),
        }
    }

    /// Create a user-owned schedule from explicit amounts
    pub fn manual<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let periods = amounts
            .into_iter()
            .enumerate()
            .map(|(index, amount)| ContributionPeriod { index, amount })
            .collect();
        Self::Manual { periods }
    }

    pub fn periods(&self) -> &[ContributionPeriod] {
        match self {
            Self::Auto { periods, .. } | Self::Manual { periods } => periods,
        }
    }

    /// Amounts in period order, as consumed by the projection engine
    pub fn amounts(&self) -> Vec<f64> {
        self.periods().iter().map(|p| p.amount).collect()
    }

    pub fn len(&self) -> usize {
        self.periods().len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods().is_empty()
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual { .. })
    }

    /// Regenerate from new parameters
    ///
    /// Returns `false` without touching the periods when the schedule is manual.
    pub fn regenerate(&mut self, new_params: ScheduleParams) -> bool {
        match self {
            Self::Auto { params, periods } => {
                *params = new_params;
                *periods = generate(&new_params);
                debug!("Regenerated schedule: {} periods", periods.len());
                true
            }
            Self::Manual { .. } => false,
        }
    }

    /// Take ownership of the current periods for manual editing
    pub fn make_manual(&mut self) {
        if let Self::Auto { periods, .. } = self {
            let periods = std::mem::take(periods);
            *self = Self::Manual { periods };
        }
    }

    /// Discard manual edits and go back to generated periods
    pub fn reset_to_auto(&mut self, params: ScheduleParams) {
        *self = Self::auto(params);
    }

    fn manual_periods(&mut self) -> Result<&mut Vec<ContributionPeriod>, ScheduleError> {
        match self {
            Self::Manual { periods } => Ok(periods),
            Self::Auto { .. } => Err(ScheduleError::NotManual),
        }
    }

    /// Overwrite the amount of one period
    pub fn set_amount(&mut self, index: usize, amount: f64) -> Result<(), ScheduleError> {
        let periods = self.manual_periods()?;
        let len = periods.len();
        let period = periods
            .get_mut(index)
            .ok_or(ScheduleError::IndexOutOfRange { index, len })?;
        period.amount = amount;
        Ok(())
    }

    /// Insert a period before `index` (or at the end when `index == len`)
    pub fn insert(&mut self, index: usize, amount: f64) -> Result<(), ScheduleError> {
        let periods = self.manual_periods()?;
        if index > periods.len() {
            return Err(ScheduleError::IndexOutOfRange { index, len: periods.len() });
        }
        periods.insert(index, ContributionPeriod { index, amount });
        renumber(periods);
        Ok(())
    }

    /// Append a period
    pub fn push(&mut self, amount: f64) -> Result<(), ScheduleError> {
        let periods = self.manual_periods()?;
        periods.push(ContributionPeriod { index: periods.len(), amount });
        Ok(())
    }

    /// Remove a period, returning it
    pub fn remove(&mut self, index: usize) -> Result<ContributionPeriod, ScheduleError> {
        let periods = self.manual_periods()?;
        if index >= periods.len() {
            return Err(ScheduleError::IndexOutOfRange { index, len: periods.len() });
        }
        let removed = periods.remove(index);
        renumber(periods);
        Ok(removed)
    }
}

fn renumber(periods: &mut [ContributionPeriod]) {
    for (index, period) in periods.iter_mut().enumerate() {
        period.index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::DurationUnit;

    fn yearly(base: f64, growth: f64, years: u32) -> ScheduleParams {
        ScheduleParams::new(base, growth, Horizon::years(years), ContributionFrequency::Yearly)
    }

    #[test]
    fn test_yearly_indexation() {
        let amounts: Vec<f64> = generate(&yearly(100.0, 0.05, 3)).iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![100.00, 105.00, 110.25]);
    }

    #[test]
    fn test_monthly_indexes_at_year_boundary() {
        let params = ScheduleParams::new(
            1000.0,
            0.10,
            Horizon::years(2),
            ContributionFrequency::Monthly,
        );
        let periods = generate(&params);
        assert_eq!(periods.len(), 24);
        assert!(periods[..12].iter().all(|p| p.amount == 1000.0));
        assert!(periods[12..].iter().all(|p| p.amount == 1100.0));
        assert_eq!(periods[23].index, 23);
    }

    #[test]
    fn test_row_counts_by_unit() {
        let months = |frequency| ScheduleParams::new(50.0, 0.0, Horizon::new(14, DurationUnit::Months), frequency);
        assert_eq!(generate(&months(ContributionFrequency::Yearly)).len(), 2);
        assert_eq!(generate(&months(ContributionFrequency::Monthly)).len(), 14);
    }

    #[test]
    fn test_zero_duration_is_empty() {
        assert!(generate(&yearly(100.0, 0.05, 0)).is_empty());
    }

    #[test]
    fn test_amounts_rounded_to_cents() {
        let periods = generate(&yearly(100.0, 0.033, 3));
        // 100 * 1.033^2 = 106.7089
        assert_eq!(periods[2].amount, 106.71);
    }

    #[test]
    fn test_regenerate_only_in_auto_mode() {
        let mut schedule = ContributionSchedule::auto(yearly(100.0, 0.0, 2));
        assert!(schedule.regenerate(yearly(200.0, 0.0, 3)));
        assert_eq!(schedule.amounts(), vec![200.0, 200.0, 200.0]);

        schedule.make_manual();
        schedule.set_amount(1, 999.0).unwrap();
        assert!(!schedule.regenerate(yearly(1.0, 0.0, 10)));
        assert_eq!(schedule.amounts(), vec![200.0, 999.0, 200.0]);

        schedule.reset_to_auto(yearly(1.0, 0.0, 2));
        assert!(!schedule.is_manual());
        assert_eq!(schedule.amounts(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_manual_edits_renumber() {
        let mut schedule = ContributionSchedule::manual([10.0, 20.0, 30.0]);
        schedule.insert(1, 15.0).unwrap();
        schedule.remove(0).unwrap();
        schedule.push(0.0).unwrap();

        let indexes: Vec<usize> = schedule.periods().iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
        assert_eq!(schedule.amounts(), vec![15.0, 20.0, 30.0, 0.0]);
    }

    #[test]
    fn test_auto_schedule_rejects_edits() {
        let mut schedule = ContributionSchedule::auto(yearly(100.0, 0.0, 2));
        assert_eq!(schedule.set_amount(0, 5.0), Err(ScheduleError::NotManual));
        assert_eq!(schedule.push(5.0), Err(ScheduleError::NotManual));
        assert_eq!(schedule.amounts(), vec![100.0, 100.0]);
    }

    #[test]
    fn test_out_of_range_edits() {
        let mut schedule = ContributionSchedule::manual([1.0]);
        assert_eq!(
            schedule.set_amount(3, 1.0),
            Err(ScheduleError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(schedule.remove(1).is_err());
        assert!(schedule.insert(1, 2.0).is_ok());
    }
}
