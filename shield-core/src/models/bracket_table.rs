use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Bracket;

/// Errors raised when a bracket schedule violates its structural invariants.
///
/// Bracket tables are static configuration. A build failure means the
/// schedule data itself is wrong, so callers should treat these as fatal at
/// startup rather than catch and retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// The schedule contains no brackets at all.
    #[error("bracket table is empty")]
    Empty,

    /// The first bracket does not start at zero income.
    #[error("first bracket '{label}' must start at zero, starts at {lower_bound}")]
    FirstLowerBoundNotZero { label: String, lower_bound: Decimal },

    /// A bracket's ceiling is at or below its floor, or its floor is negative.
    #[error("bracket '{label}' has invalid bounds [{lower_bound}, {upper_bound:?})")]
    InvalidBounds {
        label: String,
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
    },

    /// A bracket's rate is outside the fraction range (0, 1].
    #[error("bracket '{label}' has rate {rate}, expected a fraction in (0, 1]")]
    InvalidRate { label: String, rate: Decimal },

    /// A bracket does not begin where the previous bracket ends.
    #[error(
        "bracket '{label}' is not contiguous with the previous bracket \
         (expected lower bound {expected}, found {found})"
    )]
    NotContiguous {
        label: String,
        expected: Decimal,
        found: Decimal,
    },

    /// An unbounded bracket appears anywhere but the last position.
    #[error("unbounded bracket '{label}' must be the last bracket in the schedule")]
    UnboundedNotLast { label: String },

    /// Rates must not decrease as income rises (progressivity).
    #[error("bracket '{label}' has rate {rate}, below the previous bracket's {previous}")]
    DecreasingRate {
        label: String,
        rate: Decimal,
        previous: Decimal,
    },
}

/// An ordered, validated progressive tax schedule for one jurisdiction-year.
///
/// Built once via [`BracketTable::build`], immutable thereafter, and safe to
/// share across any number of allocation calls. Validation guarantees the
/// brackets are ascending, contiguous, gapless, and progressively rated, so
/// downstream calculations never re-check the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bracket>", into = "Vec<Bracket>")]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validates and builds a schedule from brackets ordered by income.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`BracketTableError`]:
    /// empty schedule, first bracket not starting at zero, incoherent bounds
    /// or rate, a gap or overlap between adjacent brackets, an unbounded
    /// bracket before the end, or a rate that decreases with income.
    pub fn build(brackets: Vec<Bracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.lower_bound != Decimal::ZERO {
            return Err(BracketTableError::FirstLowerBoundNotZero {
                label: first.label.clone(),
                lower_bound: first.lower_bound,
            });
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.lower_bound < Decimal::ZERO
                || bracket
                    .upper_bound
                    .is_some_and(|upper| upper <= bracket.lower_bound)
            {
                return Err(BracketTableError::InvalidBounds {
                    label: bracket.label.clone(),
                    lower_bound: bracket.lower_bound,
                    upper_bound: bracket.upper_bound,
                });
            }

            if bracket.upper_bound.is_none() && i + 1 != brackets.len() {
                return Err(BracketTableError::UnboundedNotLast {
                    label: bracket.label.clone(),
                });
            }

            if bracket.rate <= Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    label: bracket.label.clone(),
                    rate: bracket.rate,
                });
            }

            if i > 0 {
                let previous = &brackets[i - 1];
                // The unbounded-not-last check above already rejected an
                // unbounded previous bracket, so its ceiling is present here.
                if let Some(expected) = previous.upper_bound {
                    if bracket.lower_bound != expected {
                        return Err(BracketTableError::NotContiguous {
                            label: bracket.label.clone(),
                            expected,
                            found: bracket.lower_bound,
                        });
                    }
                }
                if bracket.rate < previous.rate {
                    return Err(BracketTableError::DecreasingRate {
                        label: bracket.label.clone(),
                        rate: bracket.rate,
                        previous: previous.rate,
                    });
                }
            }
        }

        Ok(Self { brackets })
    }

    /// The brackets in ascending income order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Rate of the bracket containing `income` (floor inclusive, ceiling
    /// exclusive), or `None` if the schedule is fully bounded and `income`
    /// lies above its top ceiling.
    pub fn rate_for(&self, income: Decimal) -> Option<Decimal> {
        self.brackets
            .iter()
            .find(|b| {
                income >= b.lower_bound
                    && b.upper_bound.is_none_or(|upper| income < upper)
            })
            .map(|b| b.rate)
    }

    /// Rate of the highest bracket that `gross_income` reaches, or `None`
    /// when the income is zero (no bracket holds any of it).
    pub fn top_rate_reached(&self, gross_income: Decimal) -> Option<Decimal> {
        self.brackets
            .iter()
            .rev()
            .find(|b| gross_income > b.lower_bound)
            .map(|b| b.rate)
    }
}

impl TryFrom<Vec<Bracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<Bracket>) -> Result<Self, Self::Error> {
        Self::build(brackets)
    }
}

impl From<BracketTable> for Vec<Bracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn three_step_brackets() -> Vec<Bracket> {
        vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
            Bracket::new("Mid", dec!(50000), dec!(100000), dec!(0.20)),
            Bracket::top("High", dec!(100000), dec!(0.30)),
        ]
    }

    // =========================================================================
    // build tests
    // =========================================================================

    #[test]
    fn build_accepts_valid_schedule() {
        let table = BracketTable::build(three_step_brackets()).unwrap();

        assert_eq!(table.brackets().len(), 3);
        assert_eq!(table.brackets()[0].label, "Low");
    }

    #[test]
    fn build_accepts_fully_bounded_schedule() {
        let brackets = vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
            Bracket::new("Mid", dec!(50000), dec!(100000), dec!(0.20)),
        ];

        assert!(BracketTable::build(brackets).is_ok());
    }

    #[test]
    fn build_rejects_empty_schedule() {
        let result = BracketTable::build(vec![]);

        assert_eq!(result, Err(BracketTableError::Empty));
    }

    #[test]
    fn build_rejects_first_bracket_not_starting_at_zero() {
        let brackets = vec![Bracket::top("High", dec!(10000), dec!(0.30))];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::FirstLowerBoundNotZero {
                label: "High".into(),
                lower_bound: dec!(10000),
            })
        );
    }

    #[test]
    fn build_rejects_ceiling_at_or_below_floor() {
        let brackets = vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
            Bracket::new("Mid", dec!(50000), dec!(50000), dec!(0.20)),
        ];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::InvalidBounds {
                label: "Mid".into(),
                lower_bound: dec!(50000),
                upper_bound: Some(dec!(50000)),
            })
        );
    }

    #[test]
    fn build_rejects_rate_above_one() {
        let brackets = vec![Bracket::top("Low", dec!(0), dec!(1.5))];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::InvalidRate {
                label: "Low".into(),
                rate: dec!(1.5),
            })
        );
    }

    #[test]
    fn build_rejects_zero_rate() {
        let brackets = vec![Bracket::top("Low", dec!(0), dec!(0))];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::InvalidRate {
                label: "Low".into(),
                rate: dec!(0),
            })
        );
    }

    #[test]
    fn build_rejects_gap_between_brackets() {
        let brackets = vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
            Bracket::top("High", dec!(60000), dec!(0.30)),
        ];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::NotContiguous {
                label: "High".into(),
                expected: dec!(50000),
                found: dec!(60000),
            })
        );
    }

    #[test]
    fn build_rejects_overlapping_brackets() {
        let brackets = vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
            Bracket::top("High", dec!(40000), dec!(0.30)),
        ];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::NotContiguous {
                label: "High".into(),
                expected: dec!(50000),
                found: dec!(40000),
            })
        );
    }

    #[test]
    fn build_rejects_unbounded_bracket_before_last() {
        let brackets = vec![
            Bracket::top("Low", dec!(0), dec!(0.10)),
            Bracket::top("High", dec!(50000), dec!(0.30)),
        ];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::UnboundedNotLast {
                label: "Low".into(),
            })
        );
    }

    #[test]
    fn build_rejects_decreasing_rates() {
        let brackets = vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.20)),
            Bracket::top("High", dec!(50000), dec!(0.10)),
        ];

        let result = BracketTable::build(brackets);

        assert_eq!(
            result,
            Err(BracketTableError::DecreasingRate {
                label: "High".into(),
                rate: dec!(0.10),
                previous: dec!(0.20),
            })
        );
    }

    #[test]
    fn build_accepts_equal_adjacent_rates() {
        let brackets = vec![
            Bracket::new("Low", dec!(0), dec!(50000), dec!(0.20)),
            Bracket::top("High", dec!(50000), dec!(0.20)),
        ];

        assert!(BracketTable::build(brackets).is_ok());
    }

    // =========================================================================
    // rate lookup tests
    // =========================================================================

    #[test]
    fn rate_for_returns_containing_bracket_rate() {
        let table = BracketTable::build(three_step_brackets()).unwrap();

        assert_eq!(table.rate_for(dec!(25000)), Some(dec!(0.10)));
        assert_eq!(table.rate_for(dec!(75000)), Some(dec!(0.20)));
        assert_eq!(table.rate_for(dec!(500000)), Some(dec!(0.30)));
    }

    #[test]
    fn rate_for_treats_floor_as_inclusive_and_ceiling_as_exclusive() {
        let table = BracketTable::build(three_step_brackets()).unwrap();

        assert_eq!(table.rate_for(dec!(50000)), Some(dec!(0.20)));
    }

    #[test]
    fn rate_for_returns_none_above_bounded_schedule() {
        let brackets = vec![Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10))];
        let table = BracketTable::build(brackets).unwrap();

        assert_eq!(table.rate_for(dec!(60000)), None);
    }

    #[test]
    fn top_rate_reached_returns_highest_touched_bracket() {
        let table = BracketTable::build(three_step_brackets()).unwrap();

        assert_eq!(table.top_rate_reached(dec!(25000)), Some(dec!(0.10)));
        assert_eq!(table.top_rate_reached(dec!(120000)), Some(dec!(0.30)));
    }

    #[test]
    fn top_rate_reached_is_none_for_zero_income() {
        let table = BracketTable::build(three_step_brackets()).unwrap();

        assert_eq!(table.top_rate_reached(dec!(0)), None);
    }

    #[test]
    fn top_rate_reached_excludes_bracket_starting_at_income() {
        let table = BracketTable::build(three_step_brackets()).unwrap();

        // 50,000 is the floor of "Mid"; no dollar of it lies inside "Mid".
        assert_eq!(table.top_rate_reached(dec!(50000)), Some(dec!(0.10)));
    }
}
