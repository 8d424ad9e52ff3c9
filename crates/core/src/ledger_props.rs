//! Property-based tests for ledger totals and reconciliation.
//!
//! The balance identity (`expected == initial + income - expense`) and the
//! reconciliation aggregates must hold for arbitrary movement sequences and
//! arbitrary counted subsets, not just the hand-picked examples.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::LedgerTotals;
use crate::movement::MovementKind;
use crate::reconciliation::{CountedAmount, MethodBalance, reconcile};

/// Strategy for cent-precision amounts between 0.01 and 50,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for cent-precision amounts between 0.00 and 50,000.00.
fn non_negative_amount() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a movement direction.
fn movement_kind() -> impl Strategy<Value = MovementKind> {
    prop_oneof![Just(MovementKind::Income), Just(MovementKind::Expense)]
}

/// Strategy for a sequence of movements.
fn movements() -> impl Strategy<Value = Vec<(MovementKind, Decimal)>> {
    prop::collection::vec((movement_kind(), positive_amount()), 0..40)
}

fn method_balance(code: &str, totals: LedgerTotals) -> MethodBalance {
    MethodBalance {
        payment_method_id: Uuid::new_v4(),
        method_code: code.to_string(),
        method_name: code.to_string(),
        totals,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any movement sequence, the balance identity holds and the totals
    /// never go negative.
    #[test]
    fn prop_expected_tracks_every_movement(
        initial in non_negative_amount(),
        moves in movements(),
    ) {
        let mut totals = LedgerTotals::opening(initial);
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;

        for (kind, amount) in moves {
            totals.apply(kind, amount);
            match kind {
                MovementKind::Income => income += amount,
                MovementKind::Expense => expense += amount,
            }

            prop_assert_eq!(totals.income, income);
            prop_assert_eq!(totals.expense, expense);
            prop_assert_eq!(totals.expected(), initial + income - expense);
            prop_assert!(totals.income >= Decimal::ZERO);
            prop_assert!(totals.expense >= Decimal::ZERO);
        }
    }

    /// Applying income and expense of the same amount always returns the
    /// expected balance to where it started.
    #[test]
    fn prop_opposite_movements_cancel(
        initial in non_negative_amount(),
        amount in positive_amount(),
    ) {
        let mut totals = LedgerTotals::opening(initial);
        totals.apply(MovementKind::Income, amount);
        totals.apply(MovementKind::Expense, amount);

        prop_assert_eq!(totals.expected(), initial);
    }

    /// For any set of balances where some methods are counted, the aggregate
    /// difference equals the sum of per-line differences, and uncounted
    /// lines never contribute.
    #[test]
    fn prop_reconciliation_aggregates_consistent(
        cash_initial in non_negative_amount(),
        cash_income in non_negative_amount(),
        cash_expense in non_negative_amount(),
        card_income in non_negative_amount(),
        counted_cash in non_negative_amount(),
    ) {
        let cash = method_balance("cash", LedgerTotals {
            initial: cash_initial,
            income: cash_income,
            expense: cash_expense,
        });
        let card = method_balance("card", LedgerTotals {
            initial: Decimal::ZERO,
            income: card_income,
            expense: Decimal::ZERO,
        });

        let counts = [CountedAmount {
            payment_method_id: cash.payment_method_id,
            amount: counted_cash,
        }];

        let result = reconcile(vec![cash, card], &counts).unwrap();

        let line_diff_sum: Decimal = result.entries.iter().map(|e| e.difference).sum();
        prop_assert_eq!(result.difference, line_diff_sum);
        prop_assert_eq!(result.difference, result.actual - result.expected);

        // The uncounted card line is assumed exact.
        prop_assert_eq!(result.entries[1].difference, Decimal::ZERO);
        prop_assert_eq!(result.entries[1].actual, result.entries[1].expected);

        // The counted cash line is exactly counted - expected.
        let cash_expected = cash_initial + cash_income - cash_expense;
        prop_assert_eq!(result.entries[0].difference, counted_cash - cash_expected);
    }

    /// Reconciling with no counts at all reports zero difference, whatever
    /// the balances look like.
    #[test]
    fn prop_no_counts_no_difference(
        initial in non_negative_amount(),
        income in non_negative_amount(),
        expense in non_negative_amount(),
    ) {
        let cash = method_balance("cash", LedgerTotals { initial, income, expense });

        let result = reconcile(vec![cash], &[]).unwrap();

        prop_assert_eq!(result.difference, Decimal::ZERO);
        prop_assert_eq!(result.actual, result.expected);
    }
}
