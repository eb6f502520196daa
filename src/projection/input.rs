//! Projection inputs and their form-field boundary

use crate::contributions::{ContributionPeriod, ContributionSchedule};
use crate::horizon::{ContributionFrequency, DurationUnit, Horizon};
use crate::parse::{parse_or_zero, parse_percent, parse_periods};
use serde::{Deserialize, Serialize};

fn default_reinvest() -> bool {
    true
}

/// Validated numeric input for one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Starting balance
    pub initial: f64,

    /// Annual interest rate as a decimal (0.07 = 7%)
    pub annual_rate: f64,

    /// Length of the projection
    pub horizon: Horizon,

    /// How often contributions are made
    pub frequency: ContributionFrequency,

    /// Yearly mode only: when false no interest accrues at all
    #[serde(default = "default_reinvest")]
    pub reinvest: bool,

    /// Scheduled contributions in period order
    #[serde(default)]
    pub contributions: Vec<ContributionPeriod>,
}

impl ProjectionInput {
    /// Create an input with no contributions and reinvestment on
    pub fn new(
        initial: f64,
        annual_rate: f64,
        horizon: Horizon,
        frequency: ContributionFrequency,
    ) -> Self {
        Self {
            initial,
            annual_rate,
            horizon,
            frequency,
            reinvest: true,
            contributions: Vec::new(),
        }
    }

    pub fn with_reinvest(mut self, reinvest: bool) -> Self {
        self.reinvest = reinvest;
        self
    }

    pub fn with_schedule(mut self, schedule: &ContributionSchedule) -> Self {
        self.contributions = schedule.periods().to_vec();
        self
    }

    pub fn with_amounts<I>(mut self, amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.contributions = amounts
            .into_iter()
            .enumerate()
            .map(|(index, amount)| ContributionPeriod { index, amount })
            .collect();
        self
    }

    /// Contribution for a period; periods past the schedule contribute 0
    pub fn contribution(&self, index: usize) -> f64 {
        self.contributions
            .get(index)
            .map(|p| p.amount)
            .filter(|a| a.is_finite())
            .unwrap_or(0.0)
    }
}

/// Raw form values as entered by the user
///
/// Blank or malformed numbers become 0; the rate is entered in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionForm {
    pub initial: String,
    pub rate_percent: String,
    pub duration: String,
    pub unit: DurationUnit,
    pub frequency: ContributionFrequency,
    #[serde(default = "default_reinvest")]
    pub reinvest: bool,
}

impl ProjectionForm {
    pub fn to_input(&self, schedule: &ContributionSchedule) -> ProjectionInput {
        ProjectionInput::new(
            parse_or_zero(&self.initial),
            parse_percent(&self.rate_percent),
            Horizon::new(parse_periods(&self.duration), self.unit),
            self.frequency,
        )
        .with_reinvest(self.reinvest)
        .with_schedule(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_past_schedule_is_zero() {
        let input = ProjectionInput::new(0.0, 0.0, Horizon::years(3), ContributionFrequency::Yearly)
            .with_amounts([100.0, f64::NAN]);
        assert_eq!(input.contribution(0), 100.0);
        assert_eq!(input.contribution(1), 0.0);
        assert_eq!(input.contribution(2), 0.0);
    }

    #[test]
    fn test_form_defaults_to_zero() {
        let form = ProjectionForm {
            initial: "".into(),
            rate_percent: "7,5".into(),
            duration: "ten".into(),
            unit: DurationUnit::Years,
            frequency: ContributionFrequency::Monthly,
            reinvest: true,
        };
        let input = form.to_input(&ContributionSchedule::manual([50.0]));
        assert_eq!(input.initial, 0.0);
        assert!((input.annual_rate - 0.075).abs() < 1e-12);
        assert_eq!(input.horizon.periods, 0);
        assert_eq!(input.contributions.len(), 1);
    }

    #[test]
    fn test_deserialize_defaults_reinvest() {
        let json = r#"{
            "initial": 1000.0,
            "annual_rate": 0.1,
            "horizon": {"periods": 3, "unit": "years"},
            "frequency": "yearly"
        }"#;
        let input: ProjectionInput = serde_json::from_str(json).unwrap();
        assert!(input.reinvest);
        assert!(input.contributions.is_empty());
    }
}
