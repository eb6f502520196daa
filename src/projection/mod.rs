//! Balance projections under periodic contributions

mod input;
mod engine;
mod result;

pub use input::{ProjectionForm, ProjectionInput};
pub use engine::{project, ProjectionEngine};
pub use result::{ProjectionResult, ProjectionSummary, YearlyBalance};
