//! Bracket allocation and contribution-planning calculations.
//!
//! [`allocation`] holds the core engine that splits gross income across the
//! brackets of a schedule into shielded and taxed slices. [`planner`] layers
//! contribution-planning helpers (lump-sum sizing, room tracking, growth
//! projection) on top of the same schedule.

pub mod allocation;
pub mod common;
pub mod planner;

pub use allocation::{
    AllocationError, AllocationOutcome, AllocationSummary, BracketAllocation, TaxAllocationEngine,
};
pub use planner::{LumpSumPlan, LumpSumPlanner, PlannerError};
