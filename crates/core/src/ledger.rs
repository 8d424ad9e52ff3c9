//! Per-payment-method running balances.
//!
//! Every ledger mutation goes through [`LedgerTotals`] so the invariant
//! `expected == initial + income - expense` is recomputed in exactly one
//! place, for the per-method rows and the session aggregate alike.

use rust_decimal::Decimal;

use crate::movement::MovementKind;

/// Running totals for one payment method within a session (or for the
/// session aggregate, which follows the same arithmetic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Starting float. Non-zero only for the cash method.
    pub initial: Decimal,
    /// Sum of income movements.
    pub income: Decimal,
    /// Sum of expense movements.
    pub expense: Decimal,
}

impl LedgerTotals {
    /// Opening totals with a starting float.
    #[must_use]
    pub const fn opening(initial: Decimal) -> Self {
        Self {
            initial,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    }

    /// Zeroed totals for a method with no starting float.
    #[must_use]
    pub const fn zero() -> Self {
        Self::opening(Decimal::ZERO)
    }

    /// Applies one movement to the running totals.
    pub fn apply(&mut self, kind: MovementKind, amount: Decimal) {
        match kind {
            MovementKind::Income => self.income += amount,
            MovementKind::Expense => self.expense += amount,
        }
    }

    /// The amount that should be on hand for this method.
    #[must_use]
    pub fn expected(&self) -> Decimal {
        self.initial + self.income - self.expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_opening_totals() {
        let totals = LedgerTotals::opening(dec!(10000));
        assert_eq!(totals.income, Decimal::ZERO);
        assert_eq!(totals.expense, Decimal::ZERO);
        assert_eq!(totals.expected(), dec!(10000));
    }

    #[test]
    fn test_income_raises_expected() {
        let mut totals = LedgerTotals::opening(dec!(10000));
        totals.apply(MovementKind::Income, dec!(1500));

        assert_eq!(totals.income, dec!(1500));
        assert_eq!(totals.expected(), dec!(11500));
    }

    #[test]
    fn test_expense_lowers_expected() {
        let mut totals = LedgerTotals::opening(dec!(10000));
        totals.apply(MovementKind::Income, dec!(5000));
        totals.apply(MovementKind::Expense, dec!(3000));

        assert_eq!(totals.income, dec!(5000));
        assert_eq!(totals.expense, dec!(3000));
        assert_eq!(totals.expected(), dec!(12000));
    }

    #[test]
    fn test_zero_totals() {
        let totals = LedgerTotals::zero();
        assert_eq!(totals.expected(), Decimal::ZERO);
    }

    #[test]
    fn test_opposite_movements_cancel() {
        let mut totals = LedgerTotals::opening(dec!(500.50));
        totals.apply(MovementKind::Income, dec!(123.45));
        totals.apply(MovementKind::Expense, dec!(123.45));

        assert_eq!(totals.expected(), dec!(500.50));
    }
}
