//! Discrete lot allocation of a lump sum across weighted assets

mod data;
mod engine;
mod error;
pub mod loader;

pub use data::{AllocationOutcome, AllocationRow, AllocationSummary, RowAllocation, WeightTotal};
pub use engine::{allocate, distribute_evenly, validate, weight_total, WEIGHT_TOLERANCE_LIMIT};
pub use error::{AllocationError, ValidationErrors};
pub use loader::{load_rows, load_rows_from_reader, LoadError};
