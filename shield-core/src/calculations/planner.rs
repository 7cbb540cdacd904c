//! Contribution-planning helpers layered on a bracket schedule.
//!
//! These cover the derived dashboard metrics: the annual payroll
//! contribution implied by salary percentages, the lump-sum top-up that
//! pulls taxable income back below a high-rate cliff, remaining
//! contribution room, and compound growth of a shielded balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{clamp_non_negative, min, round_half_up};
use crate::models::BracketTable;

/// Errors raised for invalid planning inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    /// A monetary or percentage input was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeInput {
        field: &'static str,
        value: Decimal,
    },

    /// A growth rate at or below -100% is meaningless.
    #[error("growth rate {0} must be greater than -1")]
    GrowthRateTooLow(Decimal),

    /// The cliff threshold lies above a fully bounded schedule's top ceiling.
    #[error("cliff threshold {0} lies outside the bracket schedule")]
    CliffOutsideSchedule(Decimal),
}

fn require_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, PlannerError> {
    if value < Decimal::ZERO {
        Err(PlannerError::NegativeInput { field, value })
    } else {
        Ok(value)
    }
}

/// Annual payroll contribution implied by salary percentages: the employee's
/// deferral plus the employer match, both expressed as a percent of base
/// salary.
pub fn periodic_contribution(
    base_salary: Decimal,
    employee_pct: Decimal,
    employer_pct: Decimal,
) -> Result<Decimal, PlannerError> {
    require_non_negative("base salary", base_salary)?;
    require_non_negative("employee percentage", employee_pct)?;
    require_non_negative("employer percentage", employer_pct)?;

    let total_pct = (employee_pct + employer_pct) / Decimal::ONE_HUNDRED;
    Ok(round_half_up(base_salary * total_pct))
}

/// Contribution room left after this year's deposits, clamped at zero.
pub fn room_remaining(
    total_room: Decimal,
    contributed: Decimal,
) -> Result<Decimal, PlannerError> {
    require_non_negative("contribution room", total_room)?;
    require_non_negative("contributed amount", contributed)?;

    Ok(clamp_non_negative(total_room - contributed))
}

/// Compound growth of a balance over whole years at a fixed annual rate.
///
/// The rate may be negative (a losing year) but not at or below -1.
pub fn project_growth(
    principal: Decimal,
    annual_rate: Decimal,
    years: u32,
) -> Result<Decimal, PlannerError> {
    require_non_negative("principal", principal)?;
    if annual_rate <= Decimal::NEGATIVE_ONE {
        return Err(PlannerError::GrowthRateTooLow(annual_rate));
    }

    let factor = Decimal::ONE + annual_rate;
    let mut balance = principal;
    for _ in 0..years {
        balance *= factor;
    }
    Ok(round_half_up(balance))
}

/// Recommended one-time contribution before the filing deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumpSumPlan {
    /// Taxable income sitting above the cliff threshold.
    pub income_above_cliff: Decimal,

    /// The lump sum to contribute: income above the cliff, clamped to the
    /// unused contribution room.
    pub recommended_lump_sum: Decimal,

    /// Refund estimate for the lump sum at the cliff bracket's rate.
    pub estimated_refund: Decimal,
}

/// Sizes a deadline lump-sum contribution against a high-rate cliff.
///
/// The cliff is the income level above which the schedule's rates jump
/// sharply; the planner recommends contributing exactly the taxable income
/// above it, limited by the room still available.
#[derive(Debug, Clone)]
pub struct LumpSumPlanner<'a> {
    table: &'a BracketTable,
}

impl<'a> LumpSumPlanner<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Builds a lump-sum plan for the given taxable income.
    ///
    /// `taxable_income` should already account for payroll contributions
    /// (i.e. the engine's post-shield taxable income).
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError`] for negative inputs or a cliff that lies
    /// outside the schedule entirely.
    pub fn recommend(
        &self,
        taxable_income: Decimal,
        cliff: Decimal,
        unused_room: Decimal,
    ) -> Result<LumpSumPlan, PlannerError> {
        require_non_negative("taxable income", taxable_income)?;
        require_non_negative("cliff threshold", cliff)?;
        require_non_negative("unused room", unused_room)?;

        let refund_rate = self
            .table
            .rate_for(cliff)
            .ok_or(PlannerError::CliffOutsideSchedule(cliff))?;

        let income_above_cliff = clamp_non_negative(taxable_income - cliff);
        let recommended_lump_sum = min(income_above_cliff, unused_room);
        debug!(%income_above_cliff, %recommended_lump_sum, "sized lump-sum contribution");

        Ok(LumpSumPlan {
            income_above_cliff,
            recommended_lump_sum,
            estimated_refund: round_half_up(recommended_lump_sum * refund_rate),
        })
    }
}
