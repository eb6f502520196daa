//! Periodic contribution schedules with automatic indexation

mod schedule;
pub mod loader;

pub use schedule::{
    generate, ContributionPeriod, ContributionSchedule, ScheduleError, ScheduleParams,
};
pub use loader::{load_amounts, load_amounts_from_reader};
