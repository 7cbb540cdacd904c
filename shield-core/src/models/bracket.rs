use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal tax bracket: a contiguous income range taxed at a single rate.
///
/// Income in `[lower_bound, upper_bound)` is taxed at `rate`. The top bracket
/// of a schedule carries `upper_bound: None`, meaning it has no ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Display name for the bracket (e.g. "Floor 1", "Penthouse").
    pub label: String,

    /// Inclusive floor of the bracket.
    pub lower_bound: Decimal,

    /// Exclusive ceiling of the bracket, or `None` for the unbounded top bracket.
    pub upper_bound: Option<Decimal>,

    /// Marginal rate applied to income within the bracket, as a fraction in (0, 1].
    pub rate: Decimal,
}

impl Bracket {
    /// Creates a bounded bracket.
    pub fn new(
        label: impl Into<String>,
        lower_bound: Decimal,
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            lower_bound,
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    /// Creates the unbounded top bracket of a schedule.
    pub fn top(
        label: impl Into<String>,
        lower_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            lower_bound,
            upper_bound: None,
            rate,
        }
    }
}
