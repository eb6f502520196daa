//! Projection engine for yearly and monthly contribution plans
//!
//! Interest is simple and proportional to time left in the horizon; nothing
//! compounds within the monthly plan. The yearly plan applies a full year of
//! interest to the running balance before each year-end contribution.

use super::input::ProjectionInput;
use super::result::ProjectionResult;
use crate::horizon::{ContributionFrequency, MONTHS_PER_YEAR};
use log::{debug, warn};

const MONTHS: f64 = MONTHS_PER_YEAR as f64;

/// Runs a projection over one input
pub struct ProjectionEngine<'a> {
    input: &'a ProjectionInput,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(input: &'a ProjectionInput) -> Self {
        Self { input }
    }

    /// Run the projection for the input's contribution frequency
    pub fn project(&self) -> ProjectionResult {
        match self.input.frequency {
            ContributionFrequency::Monthly => self.project_monthly(),
            ContributionFrequency::Yearly => self.project_yearly(),
        }
    }

    /// Monthly contributions: each one earns simple interest for the months
    /// left until the end of the horizon
    fn project_monthly(&self) -> ProjectionResult {
        let input = self.input;
        let rate = input.annual_rate;
        let total_months = input.horizon.total_months();
        let mut result = ProjectionResult::new(input.initial);

        let mut final_balance = input.initial * (1.0 + rate * input.horizon.total_years());
        for month in 0..total_months {
            let amount = input.contribution(month as usize);
            let years_remaining = (total_months - month) as f64 / MONTHS;
            final_balance += amount * (1.0 + rate * years_remaining);
            result.total_contributed += amount;
        }
        result.final_balance = final_balance;

        for year in 1..=input.horizon.started_years() {
            let months_up_to_year = (year * MONTHS_PER_YEAR).min(total_months);
            result.add_year(year, self.monthly_balance_at(months_up_to_year));
        }

        if let Some(last) = result.breakdown.last() {
            let gap = last.balance - final_balance;
            if gap.abs() > 1e-9 * final_balance.abs().max(1.0) {
                warn!(
                    "{} balance {:.2} differs from final balance {:.2} by {:.2}",
                    last.label(),
                    last.balance,
                    final_balance,
                    gap
                );
            }
        }

        result
    }

    /// Point-in-time balance after `months_up_to_year` months
    ///
    /// Contributions made later are excluded. An included contribution earns
    /// interest for the lesser of its remaining life and the time it has been
    /// invested, both counted from the month after it was made.
    fn monthly_balance_at(&self, months_up_to_year: u32) -> f64 {
        let input = self.input;
        let rate = input.annual_rate;
        let total_months = input.horizon.total_months();

        let mut balance = input.initial * (1.0 + rate * (months_up_to_year as f64 / MONTHS));
        for month in 0..months_up_to_year {
            let amount = input.contribution(month as usize);
            let months_remaining_at_investment = total_months - month - 1;
            let months_earned = months_remaining_at_investment.min(months_up_to_year - month - 1);
            balance += amount * (1.0 + rate * (months_earned as f64 / MONTHS));
        }
        balance
    }

    /// Yearly contributions: interest on the running balance (only when
    /// reinvesting), then that year's contribution
    fn project_yearly(&self) -> ProjectionResult {
        let input = self.input;
        let mut result = ProjectionResult::new(input.initial);
        let calculation_years = input.horizon.started_years();

        if !input.reinvest {
            debug!("Reinvest disabled: projecting contributions without interest");
        }

        let mut balance = input.initial;
        for year in 1..=calculation_years {
            if input.reinvest {
                balance *= 1.0 + input.annual_rate;
            }

            let amount = input.contribution(year as usize - 1);
            balance += amount;
            result.total_contributed += amount;

            result.add_year(year, balance);
        }
        result.final_balance = balance;

        result
    }
}

/// Project a balance trajectory for the given input
pub fn project(input: &ProjectionInput) -> ProjectionResult {
    ProjectionEngine::new(input).project()
}
