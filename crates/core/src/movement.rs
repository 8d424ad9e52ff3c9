//! Cash movement kinds and origins.
//!
//! A movement is one event that changes what is in the drawer. Direction is
//! carried solely by [`MovementKind`]; amounts are always non-negative. The
//! origin is a closed set of variants, each of which knows its reference
//! document and display text, so describing a movement never needs a join.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RegisterError;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Money into the drawer.
    Income,
    /// Money out of the drawer.
    Expense,
}

impl MovementKind {
    /// Returns the lowercase string form used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a movement kind from its wire form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMovementType` for anything but `income`/`expense`.
    pub fn parse(s: &str) -> Result<Self, RegisterError> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(RegisterError::InvalidMovementType(other.to_string())),
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a cash movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovementSource {
    /// Payment collected for a completed sale.
    SalePayment {
        /// The sale being paid.
        sale_id: Uuid,
    },
    /// Expense document paid out of the drawer.
    Expense {
        /// The expense being paid.
        expense_id: Uuid,
    },
    /// Supplier purchase paid out of the drawer.
    Purchase {
        /// The purchase being paid.
        purchase_id: Uuid,
    },
    /// Miscellaneous income document (service income and the like).
    Income {
        /// The income document.
        income_id: Uuid,
    },
    /// Payment received against a customer account.
    AccountPayment {
        /// The account payment record.
        payment_id: Uuid,
    },
    /// Manual adjustment entered at the register.
    Manual {
        /// What the adjustment is for.
        description: String,
        /// Free-form notes from the cashier.
        notes: Option<String>,
    },
}

impl MovementSource {
    /// Returns the reference type stored with the movement.
    #[must_use]
    pub const fn reference_type(&self) -> &'static str {
        match self {
            Self::SalePayment { .. } => "sale_payment",
            Self::Expense { .. } => "expense",
            Self::Purchase { .. } => "purchase",
            Self::Income { .. } => "income",
            Self::AccountPayment { .. } => "account_payment",
            Self::Manual { .. } => "manual",
        }
    }

    /// Returns the id of the originating document, if any.
    #[must_use]
    pub const fn reference_id(&self) -> Option<Uuid> {
        match self {
            Self::SalePayment { sale_id } => Some(*sale_id),
            Self::Expense { expense_id } => Some(*expense_id),
            Self::Purchase { purchase_id } => Some(*purchase_id),
            Self::Income { income_id } => Some(*income_id),
            Self::AccountPayment { payment_id } => Some(*payment_id),
            Self::Manual { .. } => None,
        }
    }

    /// Returns the direction this source always moves money in, or `None`
    /// for manual movements where the cashier chooses.
    #[must_use]
    pub const fn implied_kind(&self) -> Option<MovementKind> {
        match self {
            Self::SalePayment { .. } | Self::Income { .. } | Self::AccountPayment { .. } => {
                Some(MovementKind::Income)
            }
            Self::Expense { .. } | Self::Purchase { .. } => Some(MovementKind::Expense),
            Self::Manual { .. } => None,
        }
    }

    /// Returns the display description for this movement.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::SalePayment { sale_id } => format!("Sale payment {sale_id}"),
            Self::Expense { expense_id } => format!("Expense payment {expense_id}"),
            Self::Purchase { purchase_id } => format!("Purchase payment {purchase_id}"),
            Self::Income { income_id } => format!("Service income {income_id}"),
            Self::AccountPayment { payment_id } => {
                format!("Customer account payment {payment_id}")
            }
            Self::Manual { description, .. } => description.clone(),
        }
    }

    /// Returns the cashier's notes, present only on manual movements.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        match self {
            Self::Manual { notes, .. } => notes.as_deref(),
            _ => None,
        }
    }
}

/// A validated movement ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    /// Direction.
    pub kind: MovementKind,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Where the money came from or went.
    pub source: MovementSource,
}

impl NewMovement {
    /// Builds a movement from a document-backed source; the direction comes
    /// from the source itself. A negative amount is normalized to its
    /// absolute value so refund-style origin records flow through; the
    /// stored direction never flips. Manual movements must go through
    /// [`NewMovement::manual`].
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` for a zero amount, or `InvalidMovementType`
    /// if passed a manual source.
    pub fn from_source(source: MovementSource, amount: Decimal) -> Result<Self, RegisterError> {
        if amount == Decimal::ZERO {
            return Err(RegisterError::ZeroAmount);
        }
        let kind = source
            .implied_kind()
            .ok_or_else(|| RegisterError::InvalidMovementType("manual".to_string()))?;
        Ok(Self {
            kind,
            amount: amount.abs(),
            source,
        })
    }

    /// Builds a manual movement entered at the register.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`/`NegativeAmount` for bad amounts, or
    /// `MissingDescription` if the description is blank.
    pub fn manual(
        kind: MovementKind,
        amount: Decimal,
        description: &str,
        notes: Option<String>,
    ) -> Result<Self, RegisterError> {
        validate_amount(amount)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(RegisterError::MissingDescription);
        }
        Ok(Self {
            kind,
            amount,
            source: MovementSource::Manual {
                description: description.to_string(),
                notes,
            },
        })
    }
}

fn validate_amount(amount: Decimal) -> Result<(), RegisterError> {
    if amount == Decimal::ZERO {
        return Err(RegisterError::ZeroAmount);
    }
    if amount < Decimal::ZERO {
        return Err(RegisterError::NegativeAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_parse() {
        assert_eq!(MovementKind::parse("income").unwrap(), MovementKind::Income);
        assert_eq!(
            MovementKind::parse("expense").unwrap(),
            MovementKind::Expense
        );
        assert_eq!(
            MovementKind::parse("transfer"),
            Err(RegisterError::InvalidMovementType("transfer".to_string()))
        );
    }

    #[rstest]
    #[case(MovementSource::SalePayment { sale_id: Uuid::nil() }, "sale_payment", MovementKind::Income)]
    #[case(MovementSource::Expense { expense_id: Uuid::nil() }, "expense", MovementKind::Expense)]
    #[case(MovementSource::Purchase { purchase_id: Uuid::nil() }, "purchase", MovementKind::Expense)]
    #[case(MovementSource::Income { income_id: Uuid::nil() }, "income", MovementKind::Income)]
    #[case(MovementSource::AccountPayment { payment_id: Uuid::nil() }, "account_payment", MovementKind::Income)]
    fn test_document_sources(
        #[case] source: MovementSource,
        #[case] reference_type: &str,
        #[case] kind: MovementKind,
    ) {
        assert_eq!(source.reference_type(), reference_type);
        assert_eq!(source.implied_kind(), Some(kind));
        assert_eq!(source.reference_id(), Some(Uuid::nil()));

        let movement = NewMovement::from_source(source, dec!(150.00)).unwrap();
        assert_eq!(movement.kind, kind);
        assert_eq!(movement.amount, dec!(150.00));
    }

    #[test]
    fn test_describe_carries_reference() {
        let sale_id = Uuid::new_v4();
        let source = MovementSource::SalePayment { sale_id };
        assert_eq!(source.describe(), format!("Sale payment {sale_id}"));
    }

    #[test]
    fn test_manual_movement() {
        let movement = NewMovement::manual(
            MovementKind::Expense,
            dec!(200),
            "  Courier fee  ",
            Some("paid from drawer".to_string()),
        )
        .unwrap();

        assert_eq!(movement.kind, MovementKind::Expense);
        assert_eq!(movement.source.reference_type(), "manual");
        assert_eq!(movement.source.reference_id(), None);
        assert_eq!(movement.source.describe(), "Courier fee");
        assert_eq!(movement.source.notes(), Some("paid from drawer"));
    }

    #[test]
    fn test_manual_requires_description() {
        let result = NewMovement::manual(MovementKind::Income, dec!(100), "   ", None);
        assert_eq!(result, Err(RegisterError::MissingDescription));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let source = MovementSource::SalePayment {
            sale_id: Uuid::new_v4(),
        };
        assert_eq!(
            NewMovement::from_source(source, Decimal::ZERO),
            Err(RegisterError::ZeroAmount)
        );
    }

    #[test]
    fn test_negative_document_amount_normalized() {
        // A refunded sale arrives as a negative amount; the drawer still
        // sees a positive income movement.
        let source = MovementSource::SalePayment {
            sale_id: Uuid::new_v4(),
        };
        let movement = NewMovement::from_source(source, dec!(-75.50)).unwrap();
        assert_eq!(movement.amount, dec!(75.50));
        assert_eq!(movement.kind, MovementKind::Income);
    }

    #[test]
    fn test_manual_negative_amount_rejected() {
        let result = NewMovement::manual(MovementKind::Expense, dec!(-5), "typo", None);
        assert_eq!(result, Err(RegisterError::NegativeAmount));
    }

    #[test]
    fn test_manual_source_rejected_by_from_source() {
        let source = MovementSource::Manual {
            description: "adjustment".to_string(),
            notes: None,
        };
        assert_eq!(
            NewMovement::from_source(source, dec!(10)),
            Err(RegisterError::InvalidMovementType("manual".to_string()))
        );
    }

    #[test]
    fn test_non_manual_sources_have_no_notes() {
        let source = MovementSource::Purchase {
            purchase_id: Uuid::new_v4(),
        };
        assert_eq!(source.notes(), None);
    }
}
