//! Built-in bracket schedules.
//!
//! Schedules are static configuration: they are constructed through
//! [`BracketTable::build`] so the structural invariants are enforced before
//! anything downstream runs, and a bad table aborts startup instead of
//! producing silently wrong allocations.

use rust_decimal::Decimal;
use shield_core::{Bracket, BracketTable};

fn rate(ten_thousandths: i64) -> Decimal {
    // e.g. 1905 -> 0.1905
    Decimal::new(ten_thousandths, 4)
}

/// Income level above which the combined 2026 ON/federal rate jumps to
/// 48.29%, the "efficiency cliff" the lump-sum planner targets.
pub fn efficiency_cliff() -> Decimal {
    Decimal::from(181_440u32)
}

/// Combined Ontario + federal marginal rate schedule for 2026.
///
/// Uses the 14% federal base with indexed Ontario thresholds. Floor labels
/// follow the "tax building" presentation of the dashboard this library
/// backs.
pub fn on_combined_2026() -> BracketTable {
    BracketTable::build(vec![
        Bracket::new("Floor 1", Decimal::ZERO, Decimal::from(53_891u32), rate(1905)),
        Bracket::new(
            "Floor 2",
            Decimal::from(53_891u32),
            Decimal::from(58_523u32),
            rate(2315),
        ),
        Bracket::new(
            "Floor 3",
            Decimal::from(58_523u32),
            Decimal::from(94_907u32),
            rate(2965),
        ),
        Bracket::new(
            "Floor 4",
            Decimal::from(94_907u32),
            Decimal::from(117_045u32),
            rate(3148),
        ),
        Bracket::new(
            "Floor 5",
            Decimal::from(117_045u32),
            Decimal::from(181_440u32),
            rate(4497),
        ),
        Bracket::new(
            "Penthouse",
            Decimal::from(181_440u32),
            Decimal::from(258_482u32),
            rate(4829),
        ),
        Bracket::top("Skyline", Decimal::from(258_482u32), rate(5353)),
    ])
    .expect("built-in 2026 ON/federal schedule satisfies the bracket invariants")
}
