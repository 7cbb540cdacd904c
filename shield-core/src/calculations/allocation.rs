//! Progressive bracket allocation with top-down shielding.
//!
//! The engine splits a gross income across the brackets of a
//! [`BracketTable`] and, for each bracket, reports how much of that
//! bracket's income is shielded by tax-deferred contributions and how much
//! remains taxed. Shielding is top-down: taxable income is gross income
//! minus contributions, so any bracket lying above the taxable line but at
//! or below gross income is fully shielded, a bracket straddling the line is
//! partially shielded, and everything below the line stays fully taxed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use shield_core::{Bracket, BracketTable, TaxAllocationEngine};
//!
//! let table = BracketTable::build(vec![
//!     Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
//!     Bracket::new("Mid", dec!(50000), dec!(100000), dec!(0.20)),
//!     Bracket::top("High", dec!(100000), dec!(0.30)),
//! ])
//! .unwrap();
//!
//! let engine = TaxAllocationEngine::new(&table);
//! let outcome = engine.allocate(dec!(120000), dec!(30000)).unwrap();
//!
//! // The 30,000 contribution empties the top bracket and eats 10,000
//! // out of the middle one.
//! assert_eq!(outcome.allocations[2].shielded, dec!(20000));
//! assert_eq!(outcome.allocations[1].shielded, dec!(10000));
//! assert_eq!(outcome.allocations[0].shielded, dec!(0));
//! assert_eq!(outcome.summary.total_tax, dec!(13000.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::calculations::common::{clamp_non_negative, min, round_half_up};
use crate::models::BracketTable;

/// Errors raised for invalid allocation inputs.
///
/// Negative amounts indicate a caller bug, so they are rejected outright
/// rather than clamped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// Gross income was negative.
    #[error("gross income must not be negative, got {0}")]
    NegativeIncome(Decimal),

    /// The tax-deferred contribution amount was negative.
    #[error("contribution amount must not be negative, got {0}")]
    NegativeContribution(Decimal),
}

/// The slice of gross income that falls inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketAllocation {
    /// Label of the source bracket.
    pub label: String,

    /// Portion of gross income inside this bracket's range.
    pub amount_in_bracket: Decimal,

    /// Portion of `amount_in_bracket` shielded by contributions.
    pub shielded: Decimal,

    /// Portion of `amount_in_bracket` taxed this year.
    /// Always equals `amount_in_bracket - shielded`.
    pub taxed: Decimal,

    /// The bracket's marginal rate, carried through for display and
    /// aggregation.
    pub rate: Decimal,
}

/// Aggregate figures across all emitted allocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Gross income minus contributions, clamped at zero.
    pub taxable_income: Decimal,

    /// Sum of `taxed * rate` over all brackets, rounded to cents.
    pub total_tax: Decimal,

    /// Rate of the highest bracket with any taxed income, or zero when
    /// nothing is taxed.
    pub marginal_rate: Decimal,

    /// Total income shielded across all brackets.
    pub total_shielded: Decimal,

    /// Refund estimate for the contribution: the effective shield multiplied
    /// by the rate of the highest bracket gross income reaches. This is the
    /// rate the shielded dollars would otherwise have been taxed at, so it
    /// approximates the refund a contribution of that size generates.
    pub estimated_refund: Decimal,
}

/// Full result of one allocation: per-bracket slices plus aggregates.
///
/// Allocations are ordered ascending by bracket and stop at the first
/// bracket gross income does not reach; brackets above that hold no income,
/// since the schedule is contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub allocations: Vec<BracketAllocation>,
    pub summary: AllocationSummary,
}

/// Splits gross income across a bracket schedule into shielded and taxed
/// slices.
///
/// The engine is a pure function of its inputs: it performs no I/O, never
/// mutates the schedule, and may be called concurrently from any number of
/// threads.
#[derive(Debug, Clone)]
pub struct TaxAllocationEngine<'a> {
    table: &'a BracketTable,
}

impl<'a> TaxAllocationEngine<'a> {
    /// Creates an engine over a validated schedule.
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Allocates `gross_income` across the schedule, shielding up to
    /// `shield_amount` of it from the top bracket down.
    ///
    /// A contribution larger than gross income simply shields everything;
    /// taxable income is clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] when either input is negative.
    pub fn allocate(
        &self,
        gross_income: Decimal,
        shield_amount: Decimal,
    ) -> Result<AllocationOutcome, AllocationError> {
        if gross_income < Decimal::ZERO {
            return Err(AllocationError::NegativeIncome(gross_income));
        }
        if shield_amount < Decimal::ZERO {
            return Err(AllocationError::NegativeContribution(shield_amount));
        }

        let taxable_income = clamp_non_negative(gross_income - shield_amount);
        trace!(%gross_income, %shield_amount, %taxable_income, "allocating income across brackets");

        let mut allocations = Vec::new();
        for bracket in self.table.brackets() {
            let ceiling = bracket.upper_bound.unwrap_or(Decimal::MAX);

            let amount_in_bracket =
                clamp_non_negative(min(gross_income, ceiling) - bracket.lower_bound);
            if amount_in_bracket <= Decimal::ZERO {
                // Brackets are contiguous, so income cannot skip this
                // bracket and reappear in a higher one.
                break;
            }

            let taxed = clamp_non_negative(min(ceiling, taxable_income) - bracket.lower_bound);
            let shielded = amount_in_bracket - taxed;

            allocations.push(BracketAllocation {
                label: bracket.label.clone(),
                amount_in_bracket,
                shielded,
                taxed,
                rate: bracket.rate,
            });
        }

        let summary = self.summarize(&allocations, gross_income, shield_amount, taxable_income);

        Ok(AllocationOutcome {
            allocations,
            summary,
        })
    }

    fn summarize(
        &self,
        allocations: &[BracketAllocation],
        gross_income: Decimal,
        shield_amount: Decimal,
        taxable_income: Decimal,
    ) -> AllocationSummary {
        let total_tax: Decimal = allocations.iter().map(|a| a.taxed * a.rate).sum();
        let total_shielded: Decimal = allocations.iter().map(|a| a.shielded).sum();

        let marginal_rate = allocations
            .iter()
            .rev()
            .find(|a| a.taxed > Decimal::ZERO)
            .map(|a| a.rate)
            .unwrap_or(Decimal::ZERO);

        // Refund policy: contributions displace the highest-taxed dollars,
        // so the estimate uses the rate of the top bracket gross income
        // reaches, applied to the part of the contribution that actually
        // shields income.
        let effective_shield = min(shield_amount, gross_income);
        let refund_rate = self
            .table
            .top_rate_reached(gross_income)
            .unwrap_or(Decimal::ZERO);

        AllocationSummary {
            taxable_income,
            total_tax: round_half_up(total_tax),
            marginal_rate,
            total_shielded,
            estimated_refund: round_half_up(effective_shield * refund_rate),
        }
    }
}
