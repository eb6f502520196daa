//! Projection output structures

use serde::{Deserialize, Serialize};

/// Balance at the end of one elapsed year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyBalance {
    /// 1-indexed year
    pub period: u32,
    pub balance: f64,
}

impl YearlyBalance {
    pub fn label(&self) -> String {
        format!("Year {}", self.period)
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Balance at the end of the horizon
    pub final_balance: f64,

    /// One entry per started year
    pub breakdown: Vec<YearlyBalance>,

    /// Starting balance
    pub initial: f64,

    /// Sum of contributions that fell inside the horizon
    pub total_contributed: f64,
}

impl ProjectionResult {
    pub fn new(initial: f64) -> Self {
        Self {
            final_balance: initial,
            breakdown: Vec::new(),
            initial,
            total_contributed: 0.0,
        }
    }

    /// Record a year-end balance
    pub fn add_year(&mut self, period: u32, balance: f64) {
        self.breakdown.push(YearlyBalance { period, balance });
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let growth = self.final_balance - self.initial - self.total_contributed;
        let invested = self.initial + self.total_contributed;

        ProjectionSummary {
            years: self.breakdown.len() as u32,
            initial: self.initial,
            total_contributed: self.total_contributed,
            final_balance: self.final_balance,
            growth,
            growth_pct: if invested > 0.0 { growth / invested * 100.0 } else { 0.0 },
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub initial: f64,
    pub total_contributed: f64,
    pub final_balance: f64,
    /// Interest earned: final - initial - contributions
    pub growth: f64,
    /// Growth relative to everything paid in, in percent
    pub growth_pct: f64,
}
