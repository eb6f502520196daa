//! Investment horizon: duration units and contribution frequencies

use serde::{Deserialize, Serialize};

/// Months in a calendar year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Unit the user entered the duration in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Years,
    Months,
}

/// How often a periodic contribution is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionFrequency {
    /// One contribution at the end of every year
    #[default]
    Yearly,
    /// One contribution every month
    Monthly,
}

/// A duration expressed as a count of periods in some unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Horizon {
    pub periods: u32,
    pub unit: DurationUnit,
}

impl Horizon {
    pub fn new(periods: u32, unit: DurationUnit) -> Self {
        Self { periods, unit }
    }

    pub fn years(periods: u32) -> Self {
        Self::new(periods, DurationUnit::Years)
    }

    pub fn months(periods: u32) -> Self {
        Self::new(periods, DurationUnit::Months)
    }

    /// Total duration normalized to months
    pub fn total_months(&self) -> u32 {
        match self.unit {
            DurationUnit::Months => self.periods,
            DurationUnit::Years => self.periods.saturating_mul(MONTHS_PER_YEAR),
        }
    }

    /// Total duration in (possibly fractional) years
    pub fn total_years(&self) -> f64 {
        self.total_months() as f64 / MONTHS_PER_YEAR as f64
    }

    /// Number of started years, i.e. ceil(total_years)
    ///
    /// A 14-month horizon spans 2 years; a 24-month horizon spans 2 years.
    pub fn started_years(&self) -> u32 {
        match self.unit {
            DurationUnit::Years => self.periods,
            DurationUnit::Months => self.periods.div_ceil(MONTHS_PER_YEAR),
        }
    }

    /// Number of contributions a schedule of the given frequency holds
    pub fn contribution_count(&self, frequency: ContributionFrequency) -> u32 {
        match frequency {
            ContributionFrequency::Yearly => self.started_years(),
            ContributionFrequency::Monthly => self.total_months(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_months() {
        assert_eq!(Horizon::years(3).total_months(), 36);
        assert_eq!(Horizon::months(14).total_months(), 14);
        assert_eq!(Horizon::years(0).total_months(), 0);
    }

    #[test]
    fn test_started_years_rounds_up() {
        assert_eq!(Horizon::months(1).started_years(), 1);
        assert_eq!(Horizon::months(12).started_years(), 1);
        assert_eq!(Horizon::months(13).started_years(), 2);
        assert_eq!(Horizon::years(5).started_years(), 5);
    }

    #[test]
    fn test_contribution_count() {
        // Yearly: ceil(months / 12) for month durations
        assert_eq!(Horizon::months(18).contribution_count(ContributionFrequency::Yearly), 2);
        assert_eq!(Horizon::years(4).contribution_count(ContributionFrequency::Yearly), 4);

        // Monthly: one per month
        assert_eq!(Horizon::years(2).contribution_count(ContributionFrequency::Monthly), 24);
        assert_eq!(Horizon::months(7).contribution_count(ContributionFrequency::Monthly), 7);
    }

    #[test]
    fn test_total_years_fractional() {
        assert!((Horizon::months(18).total_years() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ContributionFrequency::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        let unit: DurationUnit = serde_json::from_str("\"months\"").unwrap();
        assert_eq!(unit, DurationUnit::Months);
    }
}
