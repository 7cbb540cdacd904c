//! Property tests for the allocation engine over randomized incomes and
//! contributions.

use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shield_core::{Bracket, BracketTable, TaxAllocationEngine};

fn ten_twenty_thirty() -> BracketTable {
    BracketTable::build(vec![
        Bracket::new("Low", dec!(0), dec!(50000), dec!(0.10)),
        Bracket::new("Mid", dec!(50000), dec!(100000), dec!(0.20)),
        Bracket::top("High", dec!(100000), dec!(0.30)),
    ])
    .expect("test schedule is valid")
}

/// Interprets a raw cent count as a monetary amount.
fn cents(raw: u64) -> Decimal {
    Decimal::new(raw as i64, 2)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn income_is_conserved_across_brackets(
        gross_cents in 0u64..100_000_000,
        shield_cents in 0u64..120_000_000,
    ) {
        let table = ten_twenty_thirty();
        let engine = TaxAllocationEngine::new(&table);

        let outcome = engine.allocate(cents(gross_cents), cents(shield_cents)).unwrap();

        let mut total = Decimal::ZERO;
        for allocation in &outcome.allocations {
            prop_assert_eq!(
                allocation.shielded + allocation.taxed,
                allocation.amount_in_bracket
            );
            prop_assert!(allocation.shielded >= Decimal::ZERO);
            prop_assert!(allocation.taxed >= Decimal::ZERO);
            total += allocation.amount_in_bracket;
        }
        // The schedule's top bracket is unbounded, so every dollar of gross
        // income lands in some bracket.
        prop_assert_eq!(total, cents(gross_cents));
    }

    #[test]
    fn more_shielding_never_increases_tax(
        gross_cents in 0u64..100_000_000,
        shield_cents in 0u64..100_000_000,
        extra_cents in 0u64..20_000_000,
    ) {
        let table = ten_twenty_thirty();
        let engine = TaxAllocationEngine::new(&table);
        let gross = cents(gross_cents);

        let smaller = engine.allocate(gross, cents(shield_cents)).unwrap();
        let larger = engine
            .allocate(gross, cents(shield_cents) + cents(extra_cents))
            .unwrap();

        prop_assert!(larger.summary.total_shielded >= smaller.summary.total_shielded);
        prop_assert!(larger.summary.total_tax <= smaller.summary.total_tax);
    }

    #[test]
    fn no_shielding_means_full_taxation(gross_cents in 0u64..100_000_000) {
        let table = ten_twenty_thirty();
        let engine = TaxAllocationEngine::new(&table);

        let outcome = engine.allocate(cents(gross_cents), Decimal::ZERO).unwrap();

        for allocation in &outcome.allocations {
            prop_assert_eq!(allocation.shielded, Decimal::ZERO);
            prop_assert_eq!(allocation.taxed, allocation.amount_in_bracket);
        }
    }

    #[test]
    fn full_shielding_means_zero_tax(
        gross_cents in 0u64..100_000_000,
        extra_cents in 0u64..20_000_000,
    ) {
        let table = ten_twenty_thirty();
        let engine = TaxAllocationEngine::new(&table);
        let gross = cents(gross_cents);

        let outcome = engine.allocate(gross, gross + cents(extra_cents)).unwrap();

        prop_assert_eq!(outcome.summary.total_tax, Decimal::ZERO);
        prop_assert_eq!(outcome.summary.total_shielded, gross);
        prop_assert_eq!(outcome.summary.marginal_rate, Decimal::ZERO);
    }

    #[test]
    fn allocation_is_deterministic(
        gross_cents in 0u64..100_000_000,
        shield_cents in 0u64..120_000_000,
    ) {
        let table = ten_twenty_thirty();
        let engine = TaxAllocationEngine::new(&table);

        let first = engine.allocate(cents(gross_cents), cents(shield_cents)).unwrap();
        let second = engine.allocate(cents(gross_cents), cents(shield_cents)).unwrap();

        prop_assert_eq!(first, second);
    }
}
