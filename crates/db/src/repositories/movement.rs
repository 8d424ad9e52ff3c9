//! Movement recorder repository.
//!
//! Appends immutable cash movements and keeps the session and ledger
//! running totals in step with them. Each recording is one transaction:
//! the open session row is locked, the movement inserted, and both
//! aggregate levels updated before commit.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use arqo_core::{LedgerTotals, MovementKind, MovementSource, NewMovement, RegisterError};

use crate::entities::sea_orm_active_enums::CashSessionStatus;
use crate::entities::{cash_ledger_entries, cash_movements, cash_sessions, payment_methods};

use super::RepositoryError;

/// A movement with its payment method resolved.
#[derive(Debug, Clone)]
pub struct MovementWithMethod {
    /// The movement row.
    pub movement: cash_movements::Model,
    /// Payment method code.
    pub method_code: String,
    /// Payment method name.
    pub method_name: String,
}

/// Repository for recording cash movements against the open session.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment collected for a sale.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NoOpenSession`, `PaymentMethodNotFound`, or
    /// a database error.
    pub async fn record_sale_payment(
        &self,
        sale_id: Uuid,
        amount: Decimal,
        payment_method_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let movement = NewMovement::from_source(MovementSource::SalePayment { sale_id }, amount)?;
        self.record(movement, payment_method_id, created_by).await
    }

    /// Records an expense document paid from the drawer.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NoOpenSession`, `PaymentMethodNotFound`, or
    /// a database error.
    pub async fn record_expense_payment(
        &self,
        expense_id: Uuid,
        amount: Decimal,
        payment_method_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let movement = NewMovement::from_source(MovementSource::Expense { expense_id }, amount)?;
        self.record(movement, payment_method_id, created_by).await
    }

    /// Records a supplier purchase paid from the drawer.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NoOpenSession`, `PaymentMethodNotFound`, or
    /// a database error.
    pub async fn record_purchase_payment(
        &self,
        purchase_id: Uuid,
        amount: Decimal,
        payment_method_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let movement = NewMovement::from_source(MovementSource::Purchase { purchase_id }, amount)?;
        self.record(movement, payment_method_id, created_by).await
    }

    /// Records a miscellaneous income document (service income and the
    /// like).
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NoOpenSession`, `PaymentMethodNotFound`, or
    /// a database error.
    pub async fn record_service_income(
        &self,
        income_id: Uuid,
        amount: Decimal,
        payment_method_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let movement = NewMovement::from_source(MovementSource::Income { income_id }, amount)?;
        self.record(movement, payment_method_id, created_by).await
    }

    /// Records a payment received against a customer account.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NoOpenSession`, `PaymentMethodNotFound`, or
    /// a database error.
    pub async fn record_account_payment(
        &self,
        payment_id: Uuid,
        amount: Decimal,
        payment_method_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let movement =
            NewMovement::from_source(MovementSource::AccountPayment { payment_id }, amount)?;
        self.record(movement, payment_method_id, created_by).await
    }

    /// Records a manual adjustment entered at the register.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NegativeAmount`, `MissingDescription`,
    /// `NoOpenSession`, `PaymentMethodNotFound`, or a database error.
    pub async fn record_manual_movement(
        &self,
        kind: MovementKind,
        amount: Decimal,
        payment_method_id: Uuid,
        description: &str,
        notes: Option<String>,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let movement = NewMovement::manual(kind, amount, description, notes)?;
        self.record(movement, payment_method_id, created_by).await
    }

    /// Records a validated movement against the open session.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenSession`, `PaymentMethodNotFound`, or a database
    /// error.
    pub async fn record(
        &self,
        movement: NewMovement,
        payment_method_id: Uuid,
        created_by: Option<Uuid>,
    ) -> Result<cash_movements::Model, RepositoryError> {
        let txn = self.db.begin().await?;

        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RegisterError::NoOpenSession)?;

        let method = payment_methods::Entity::find_by_id(payment_method_id)
            .one(&txn)
            .await?
            .ok_or(RegisterError::PaymentMethodNotFound(payment_method_id))?;

        let now = Utc::now();
        let row = cash_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(session.id),
            movement_type: Set(movement.kind.into()),
            reference_type: Set((&movement.source).into()),
            reference_id: Set(movement.source.reference_id()),
            amount: Set(movement.amount),
            payment_method_id: Set(method.id),
            description: Set(Some(movement.source.describe())),
            notes: Set(movement.source.notes().map(ToString::to_string)),
            created_by: Set(created_by),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let (total_income, total_expense) = match movement.kind {
            MovementKind::Income => (
                session.total_income + movement.amount,
                session.total_expense,
            ),
            MovementKind::Expense => (
                session.total_income,
                session.total_expense + movement.amount,
            ),
        };
        cash_sessions::ActiveModel {
            id: Set(session.id),
            total_income: Set(total_income),
            total_expense: Set(total_expense),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        Self::upsert_ledger_entry(&txn, session.id, method.id, movement.kind, movement.amount)
            .await?;

        txn.commit().await?;

        Ok(row)
    }

    async fn upsert_ledger_entry(
        txn: &DatabaseTransaction,
        session_id: Uuid,
        payment_method_id: Uuid,
        kind: MovementKind,
        amount: Decimal,
    ) -> Result<(), DbErr> {
        let now = Utc::now();
        let existing = cash_ledger_entries::Entity::find()
            .filter(cash_ledger_entries::Column::SessionId.eq(session_id))
            .filter(cash_ledger_entries::Column::PaymentMethodId.eq(payment_method_id))
            .one(txn)
            .await?;

        if let Some(entry) = existing {
            let mut totals = LedgerTotals {
                initial: entry.initial_amount,
                income: entry.total_income,
                expense: entry.total_expense,
            };
            totals.apply(kind, amount);

            cash_ledger_entries::ActiveModel {
                id: Set(entry.id),
                total_income: Set(totals.income),
                total_expense: Set(totals.expense),
                expected_amount: Set(totals.expected()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .update(txn)
            .await?;
        } else {
            // The method became active after the session opened; its row
            // starts from zero with this movement applied.
            let mut totals = LedgerTotals::zero();
            totals.apply(kind, amount);

            cash_ledger_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                session_id: Set(session_id),
                payment_method_id: Set(payment_method_id),
                initial_amount: Set(Decimal::ZERO),
                total_income: Set(totals.income),
                total_expense: Set(totals.expense),
                expected_amount: Set(totals.expected()),
                actual_amount: Set(None),
                difference: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(txn)
            .await?;
        }

        Ok(())
    }
}

/// Fetches a session's movements with their methods resolved, ordered by
/// creation time with id as the tie-break.
pub(crate) async fn fetch_for_session<C: ConnectionTrait>(
    conn: &C,
    session_id: Uuid,
) -> Result<Vec<MovementWithMethod>, DbErr> {
    let rows = cash_movements::Entity::find()
        .filter(cash_movements::Column::SessionId.eq(session_id))
        .find_also_related(payment_methods::Entity)
        .order_by_asc(cash_movements::Column::CreatedAt)
        .order_by_asc(cash_movements::Column::Id)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(movement, method)| {
            method.map(|m| MovementWithMethod {
                movement,
                method_code: m.code,
                method_name: m.name,
            })
        })
        .collect())
}
