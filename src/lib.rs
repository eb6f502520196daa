//! Portfolio Planner - Allocation and growth engines for an investment planner
//!
//! This library provides:
//! - Discrete lot allocation of a lump sum across weighted assets
//! - Indexed contribution schedules (auto-generated or manually edited)
//! - Balance projections under time-proportional simple interest
//! - Batch scenario evaluation over many projection inputs

pub mod allocation;
pub mod contributions;
pub mod horizon;
pub mod parse;
pub mod projection;
pub mod quotes;
pub mod scenario;

// Re-export commonly used types
pub use allocation::{
    allocate, AllocationError, AllocationOutcome, AllocationRow, AllocationSummary,
};
pub use contributions::{ContributionPeriod, ContributionSchedule, ScheduleParams};
pub use horizon::{ContributionFrequency, DurationUnit, Horizon};
pub use projection::{project, ProjectionEngine, ProjectionInput, ProjectionResult, YearlyBalance};
pub use scenario::ScenarioRunner;
