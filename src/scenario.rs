//! Scenario runner for batch projections
//!
//! Holds a base projection input and evaluates many variants of it in
//! parallel. Every run is independent, so results come back in input order.

use crate::projection::{project, ProjectionInput, ProjectionResult};
use rayon::prelude::*;

/// Runs many projections that share a base input
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(input);
///
/// // Compare outcomes across interest rates
/// let results = runner.run_rates(&[0.05, 0.07, 0.09]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: ProjectionInput,
}

impl ScenarioRunner {
    pub fn new(base: ProjectionInput) -> Self {
        Self { base }
    }

    /// Run the base input as-is
    pub fn run(&self) -> ProjectionResult {
        project(&self.base)
    }

    /// Run the base input once per annual rate
    pub fn run_rates(&self, rates: &[f64]) -> Vec<ProjectionResult> {
        rates
            .par_iter()
            .map(|&annual_rate| {
                let input = ProjectionInput {
                    annual_rate,
                    ..self.base.clone()
                };
                project(&input)
            })
            .collect()
    }

    /// Run each variant produced by applying `adjust` to a copy of the base
    pub fn run_variants<F>(&self, count: usize, adjust: F) -> Vec<ProjectionResult>
    where
        F: Fn(usize, &mut ProjectionInput) + Sync,
    {
        (0..count)
            .into_par_iter()
            .map(|i| {
                let mut input = self.base.clone();
                adjust(i, &mut input);
                project(&input)
            })
            .collect()
    }

    /// Run a batch of unrelated inputs
    pub fn run_batch(inputs: &[ProjectionInput]) -> Vec<ProjectionResult> {
        inputs.par_iter().map(project).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::{ContributionFrequency, Horizon};

    fn base() -> ProjectionInput {
        ProjectionInput::new(1000.0, 0.05, Horizon::years(10), ContributionFrequency::Yearly)
            .with_amounts(vec![100.0; 10])
    }

    #[test]
    fn test_run_rates_in_order() {
        let runner = ScenarioRunner::new(base());
        let results = runner.run_rates(&[0.03, 0.05, 0.07]);
        assert_eq!(results.len(), 3);

        // Higher rate should result in higher final balance
        assert!(results[2].final_balance > results[1].final_balance);
        assert!(results[1].final_balance > results[0].final_balance);
        assert_eq!(results[1], runner.run());
    }

    #[test]
    fn test_run_variants_matches_sequential() {
        let runner = ScenarioRunner::new(base());
        let results = runner.run_variants(4, |i, input| input.horizon = Horizon::years(i as u32 + 1));

        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.breakdown.len(), i + 1);
        }
    }

    #[test]
    fn test_run_batch() {
        let inputs = vec![base(), base().with_reinvest(false)];
        let results = ScenarioRunner::run_batch(&inputs);
        assert_eq!(results[1].final_balance, 2000.0);
        assert!(results[0].final_balance > results[1].final_balance);
    }
}
