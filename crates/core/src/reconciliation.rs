//! End-of-day reconciliation ("arqueo").
//!
//! Merges the cashier's physically counted amounts into the session's ledger
//! balances. A counted method gets `actual = counted` and a signed
//! difference; an uncounted method is assumed exact (`actual = expected`,
//! difference zero) and is never flagged. Positive difference is surplus,
//! negative is shortage.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::RegisterError;
use crate::ledger::LedgerTotals;

/// One payment method's balances going into reconciliation.
#[derive(Debug, Clone)]
pub struct MethodBalance {
    /// Payment method id.
    pub payment_method_id: Uuid,
    /// Method code (e.g. `cash`).
    pub method_code: String,
    /// Human-readable method name.
    pub method_name: String,
    /// Running totals for this method.
    pub totals: LedgerTotals,
}

/// A counted amount reported by the cashier for one method.
#[derive(Debug, Clone, Copy)]
pub struct CountedAmount {
    /// Payment method id the count belongs to.
    pub payment_method_id: Uuid,
    /// The physically counted amount.
    pub amount: Decimal,
}

/// One reconciled ledger line.
#[derive(Debug, Clone)]
pub struct ReconciledEntry {
    /// Payment method id.
    pub payment_method_id: Uuid,
    /// Method code.
    pub method_code: String,
    /// Method name.
    pub method_name: String,
    /// Starting float.
    pub initial: Decimal,
    /// Total income.
    pub income: Decimal,
    /// Total expense.
    pub expense: Decimal,
    /// What should be on hand.
    pub expected: Decimal,
    /// The cashier's count, if this method was counted.
    pub counted: Option<Decimal>,
    /// Counted amount, or expected when the method was not counted.
    pub actual: Decimal,
    /// `counted - expected`, or zero when not counted.
    pub difference: Decimal,
}

/// The reconciled session: per-method lines plus aggregates.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Per-method reconciled lines, in the order the balances were given.
    pub entries: Vec<ReconciledEntry>,
    /// Sum of expected amounts across methods.
    pub expected: Decimal,
    /// Sum of actual amounts across methods.
    pub actual: Decimal,
    /// `actual - expected`; positive surplus, negative shortage.
    pub difference: Decimal,
}

/// Reconciles counted amounts against the session's ledger balances.
///
/// # Errors
///
/// Returns `NegativeAmount` for a negative count, or
/// `PaymentMethodNotFound` for a count that matches no ledger line.
pub fn reconcile(
    balances: Vec<MethodBalance>,
    counts: &[CountedAmount],
) -> Result<Reconciliation, RegisterError> {
    for count in counts {
        if count.amount < Decimal::ZERO {
            return Err(RegisterError::NegativeAmount);
        }
        if !balances
            .iter()
            .any(|b| b.payment_method_id == count.payment_method_id)
        {
            return Err(RegisterError::PaymentMethodNotFound(
                count.payment_method_id,
            ));
        }
    }

    let mut entries = Vec::with_capacity(balances.len());
    let mut expected_total = Decimal::ZERO;
    let mut actual_total = Decimal::ZERO;

    for balance in balances {
        let expected = balance.totals.expected();
        let counted = counts
            .iter()
            .find(|c| c.payment_method_id == balance.payment_method_id)
            .map(|c| c.amount);

        let actual = counted.unwrap_or(expected);
        let difference = counted.map_or(Decimal::ZERO, |c| c - expected);

        expected_total += expected;
        actual_total += actual;

        entries.push(ReconciledEntry {
            payment_method_id: balance.payment_method_id,
            method_code: balance.method_code,
            method_name: balance.method_name,
            initial: balance.totals.initial,
            income: balance.totals.income,
            expense: balance.totals.expense,
            expected,
            counted,
            actual,
            difference,
        });
    }

    Ok(Reconciliation {
        entries,
        expected: expected_total,
        actual: actual_total,
        difference: actual_total - expected_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cash_balance(initial: Decimal, income: Decimal, expense: Decimal) -> MethodBalance {
        MethodBalance {
            payment_method_id: Uuid::new_v4(),
            method_code: "cash".to_string(),
            method_name: "Cash".to_string(),
            totals: LedgerTotals {
                initial,
                income,
                expense,
            },
        }
    }

    fn card_balance(income: Decimal) -> MethodBalance {
        MethodBalance {
            payment_method_id: Uuid::new_v4(),
            method_code: "card".to_string(),
            method_name: "Card".to_string(),
            totals: LedgerTotals {
                initial: Decimal::ZERO,
                income,
                expense: Decimal::ZERO,
            },
        }
    }

    #[test]
    fn test_counted_surplus() {
        // initial 10000, income 5000, expense 3000 -> expected 12000
        let cash = cash_balance(dec!(10000), dec!(5000), dec!(3000));
        let counts = [CountedAmount {
            payment_method_id: cash.payment_method_id,
            amount: dec!(12500),
        }];

        let result = reconcile(vec![cash], &counts).unwrap();

        assert_eq!(result.expected, dec!(12000));
        assert_eq!(result.actual, dec!(12500));
        assert_eq!(result.difference, dec!(500));
        assert_eq!(result.entries[0].difference, dec!(500));
    }

    #[test]
    fn test_counted_shortage() {
        let cash = cash_balance(dec!(10000), dec!(5000), dec!(3000));
        let counts = [CountedAmount {
            payment_method_id: cash.payment_method_id,
            amount: dec!(11800),
        }];

        let result = reconcile(vec![cash], &counts).unwrap();

        assert_eq!(result.expected, dec!(12000));
        assert_eq!(result.actual, dec!(11800));
        assert_eq!(result.difference, dec!(-200));
    }

    #[test]
    fn test_uncounted_method_assumed_exact() {
        let cash = cash_balance(dec!(10000), dec!(1500), Decimal::ZERO);
        let card = card_balance(dec!(2000));
        let counts = [CountedAmount {
            payment_method_id: cash.payment_method_id,
            amount: dec!(11500),
        }];

        let result = reconcile(vec![cash, card], &counts).unwrap();

        let card_entry = &result.entries[1];
        assert_eq!(card_entry.counted, None);
        assert_eq!(card_entry.actual, dec!(2000));
        assert_eq!(card_entry.difference, Decimal::ZERO);

        // Aggregate difference comes only from the counted cash line.
        assert_eq!(result.expected, dec!(13500));
        assert_eq!(result.actual, dec!(13500));
        assert_eq!(result.difference, Decimal::ZERO);
    }

    #[test]
    fn test_multiple_counted_methods() {
        let cash = cash_balance(dec!(10000), dec!(5000), dec!(3000)); // expected 12000
        let card = card_balance(dec!(2000)); // expected 2000
        let counts = [
            CountedAmount {
                payment_method_id: cash.payment_method_id,
                amount: dec!(11800),
            },
            CountedAmount {
                payment_method_id: card.payment_method_id,
                amount: dec!(2050),
            },
        ];

        let result = reconcile(vec![cash, card], &counts).unwrap();

        assert_eq!(result.entries[0].difference, dec!(-200));
        assert_eq!(result.entries[1].difference, dec!(50));
        assert_eq!(result.difference, dec!(-150));
    }

    #[test]
    fn test_negative_count_rejected() {
        let cash = cash_balance(dec!(100), Decimal::ZERO, Decimal::ZERO);
        let counts = [CountedAmount {
            payment_method_id: cash.payment_method_id,
            amount: dec!(-1),
        }];

        let result = reconcile(vec![cash], &counts);
        assert!(matches!(result, Err(RegisterError::NegativeAmount)));
    }

    #[test]
    fn test_unknown_method_count_rejected() {
        let cash = cash_balance(dec!(100), Decimal::ZERO, Decimal::ZERO);
        let stray = Uuid::new_v4();
        let counts = [CountedAmount {
            payment_method_id: stray,
            amount: dec!(50),
        }];

        let result = reconcile(vec![cash], &counts);
        assert!(matches!(result, Err(RegisterError::PaymentMethodNotFound(id)) if id == stray));
    }

    #[test]
    fn test_zero_count_is_a_real_count() {
        // Counting zero is not the same as not counting: it flags the
        // whole expected amount as missing.
        let cash = cash_balance(dec!(300), Decimal::ZERO, Decimal::ZERO);
        let counts = [CountedAmount {
            payment_method_id: cash.payment_method_id,
            amount: Decimal::ZERO,
        }];

        let result = reconcile(vec![cash], &counts).unwrap();
        assert_eq!(result.entries[0].actual, Decimal::ZERO);
        assert_eq!(result.difference, dec!(-300));
    }
}
