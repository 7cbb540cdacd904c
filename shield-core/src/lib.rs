pub mod calculations;
pub mod models;

pub use calculations::allocation::{
    AllocationError, AllocationOutcome, AllocationSummary, BracketAllocation, TaxAllocationEngine,
};
pub use models::{Bracket, BracketTable, BracketTableError};
