//! Cash session repository.
//!
//! Owns the session lifecycle: open, close, reopen, plus the read paths
//! the register UI needs (current, status, suggested float, history,
//! detail). Every multi-step write runs inside one database transaction
//! with the pure guards from `arqo-core` exercised on rows read within
//! that same transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use arqo_core::reconciliation::{CountedAmount, MethodBalance, reconcile};
use arqo_core::session::{
    ensure_can_close, ensure_can_open, ensure_can_reopen, validate_initial_amount,
};
use arqo_core::{LedgerTotals, RegisterError, SessionSnapshot};
use arqo_shared::types::{PageRequest, PageResponse};

use crate::entities::sea_orm_active_enums::CashSessionStatus;
use crate::entities::{cash_ledger_entries, cash_sessions, payment_methods};

use super::RepositoryError;
use super::audit::{AuditAction, AuditEvent, AuditRepository};
use super::movement::MovementWithMethod;

/// Input for opening a session.
#[derive(Debug, Clone)]
pub struct OpenSessionInput {
    /// Opening float placed in the drawer.
    pub initial_amount: Decimal,
    /// Whether the cashier overrode the suggested float.
    pub manually_adjusted: bool,
    /// Why the suggested float was overridden.
    pub adjustment_reason: Option<String>,
    /// Free-form opening notes.
    pub opening_notes: Option<String>,
    /// Who opened the register.
    pub opened_by: Uuid,
}

/// Input for closing the open session.
#[derive(Debug, Clone)]
pub struct CloseSessionInput {
    /// The physically counted cash amount.
    pub actual_cash_amount: Decimal,
    /// Counted amounts for other methods, keyed by payment method id.
    pub actual_amounts: Vec<CountedAmount>,
    /// Free-form closing notes.
    pub closing_notes: Option<String>,
    /// Who closed the register.
    pub closed_by: Uuid,
}

/// Filter options for listing session history.
///
/// An exact `date` takes priority over the range bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionFilter {
    /// Exact business date.
    pub date: Option<NaiveDate>,
    /// Range start (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive).
    pub end_date: Option<NaiveDate>,
}

/// Whether the register is usable right now, and under which session.
#[derive(Debug, Clone)]
pub struct RegisterStatus {
    /// True when a session is open.
    pub has_open_register: bool,
    /// True when the open session was opened on an earlier calendar day
    /// and still needs to be closed out.
    pub is_from_previous_day: bool,
    /// The open session, if any.
    pub open_register: Option<cash_sessions::Model>,
}

/// Suggested opening float derived from the previous closed session.
#[derive(Debug, Clone)]
pub struct SuggestedInitial {
    /// The previous session's counted cash, or zero.
    pub amount: Decimal,
    /// The session the suggestion came from.
    pub previous_session_id: Option<Uuid>,
    /// That session's business date.
    pub previous_session_date: Option<NaiveDate>,
}

/// One ledger line with its payment method resolved.
#[derive(Debug, Clone)]
pub struct LedgerLine {
    /// The ledger row.
    pub entry: cash_ledger_entries::Model,
    /// Payment method code.
    pub method_code: String,
    /// Payment method name.
    pub method_name: String,
}

/// A session with its ledger rows and movements.
#[derive(Debug, Clone)]
pub struct SessionDetail {
    /// The session row.
    pub session: cash_sessions::Model,
    /// Per-method ledger lines.
    pub ledger: Vec<LedgerLine>,
    /// Movements in insertion order.
    pub movements: Vec<MovementWithMethod>,
}

/// Repository for cash session lifecycle and reads.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a new session for `today`.
    ///
    /// Inserts the session row plus one ledger row per active payment
    /// method, seeding the cash method with the opening float, all in one
    /// transaction. A race lost to a concurrent open surfaces through the
    /// unique indexes and is mapped back to the matching conflict error.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount`, `AlreadyOpen`, `AlreadyClosedToday`, or a
    /// database error.
    pub async fn open(
        &self,
        today: NaiveDate,
        input: OpenSessionInput,
    ) -> Result<cash_sessions::Model, RepositoryError> {
        validate_initial_amount(input.initial_amount)?;

        let txn = self.db.begin().await?;

        let open = Self::find_open(&txn).await?;
        let todays = Self::find_by_date(&txn, today).await?;
        ensure_can_open(
            open.map(|m| snapshot(&m)).as_ref(),
            todays.map(|m| snapshot(&m)).as_ref(),
        )?;

        let methods = payment_methods::Entity::find()
            .filter(payment_methods::Column::IsActive.eq(true))
            .order_by_asc(payment_methods::Column::Code)
            .all(&txn)
            .await?;

        let now = Utc::now();
        let session_id = Uuid::new_v4();
        let opening_notes = compose_opening_notes(
            input.opening_notes.as_deref(),
            input.manually_adjusted,
            input.adjustment_reason.as_deref(),
        );

        let inserted = cash_sessions::ActiveModel {
            id: Set(session_id),
            session_date: Set(today),
            opened_at: Set(now.into()),
            closed_at: Set(None),
            initial_amount: Set(input.initial_amount),
            total_income: Set(Decimal::ZERO),
            total_expense: Set(Decimal::ZERO),
            expected_amount: Set(None),
            actual_amount: Set(None),
            difference: Set(None),
            status: Set(CashSessionStatus::Open),
            opening_notes: Set(opening_notes),
            closing_notes: Set(None),
            opened_by: Set(input.opened_by),
            closed_by: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await;

        let session = match inserted {
            Ok(session) => session,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // Lost the race to a concurrent open; re-read outside the
                // aborted transaction to name the winner.
                txn.rollback().await?;
                let open = Self::find_open(&self.db).await?;
                let todays = Self::find_by_date(&self.db, today).await?;
                ensure_can_open(
                    open.map(|m| snapshot(&m)).as_ref(),
                    todays.map(|m| snapshot(&m)).as_ref(),
                )?;
                return Err(RepositoryError::Database(e));
            }
            Err(e) => return Err(RepositoryError::Database(e)),
        };

        if !methods.is_empty() {
            let ledger_rows = methods.iter().map(|method| {
                let initial = if method.is_cash {
                    input.initial_amount
                } else {
                    Decimal::ZERO
                };
                cash_ledger_entries::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    session_id: Set(session_id),
                    payment_method_id: Set(method.id),
                    initial_amount: Set(initial),
                    total_income: Set(Decimal::ZERO),
                    total_expense: Set(Decimal::ZERO),
                    expected_amount: Set(initial),
                    actual_amount: Set(None),
                    difference: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                }
            });
            cash_ledger_entries::Entity::insert_many(ledger_rows)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        self.audit().record(AuditEvent {
            entity_type: "cash_session",
            entity_id: session.id,
            action: AuditAction::Open,
            actor: Some(input.opened_by),
            before: None,
            after: Some(json!({
                "sessionDate": session.session_date,
                "initialAmount": session.initial_amount,
                "manuallyAdjusted": input.manually_adjusted,
                "adjustmentReason": input.adjustment_reason,
            })),
            description: format!("Cash session opened for {}", session.session_date),
        });

        Ok(session)
    }

    /// Closes the open session, reconciling counted amounts against the
    /// ledger.
    ///
    /// The open session row is locked for the duration of the transaction;
    /// ledger finalization and the status flip commit together.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenSession`, `NegativeAmount`, `PaymentMethodNotFound`,
    /// or a database error.
    pub async fn close(
        &self,
        input: CloseSessionInput,
    ) -> Result<cash_sessions::Model, RepositoryError> {
        let txn = self.db.begin().await?;

        let session = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RegisterError::NoOpenSession)?;
        ensure_can_close(&snapshot(&session))?;

        let mut rows = cash_ledger_entries::Entity::find()
            .filter(cash_ledger_entries::Column::SessionId.eq(session.id))
            .find_also_related(payment_methods::Entity)
            .all(&txn)
            .await?
            .into_iter()
            .filter_map(|(entry, method)| method.map(|m| (entry, m)))
            .collect::<Vec<_>>();

        let counts = Self::full_counts(&txn, &rows, &input).await?;
        Self::ensure_rows_for_counts(&txn, &mut rows, &counts, &session).await?;

        let balances = rows
            .iter()
            .map(|(entry, method)| MethodBalance {
                payment_method_id: entry.payment_method_id,
                method_code: method.code.clone(),
                method_name: method.name.clone(),
                totals: LedgerTotals {
                    initial: entry.initial_amount,
                    income: entry.total_income,
                    expense: entry.total_expense,
                },
            })
            .collect();
        let reconciliation = reconcile(balances, &counts)?;

        let now = Utc::now();
        for line in &reconciliation.entries {
            let Some((entry, _)) = rows
                .iter()
                .find(|(e, _)| e.payment_method_id == line.payment_method_id)
            else {
                continue;
            };
            cash_ledger_entries::ActiveModel {
                id: Set(entry.id),
                actual_amount: Set(Some(line.actual)),
                difference: Set(Some(line.difference)),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .update(&txn)
            .await?;
        }

        let closed = cash_sessions::ActiveModel {
            id: Set(session.id),
            status: Set(CashSessionStatus::Closed),
            closed_at: Set(Some(now.into())),
            closed_by: Set(Some(input.closed_by)),
            expected_amount: Set(Some(reconciliation.expected)),
            actual_amount: Set(Some(reconciliation.actual)),
            difference: Set(Some(reconciliation.difference)),
            closing_notes: Set(input.closing_notes.clone()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        self.audit().record(AuditEvent {
            entity_type: "cash_session",
            entity_id: closed.id,
            action: AuditAction::Close,
            actor: Some(input.closed_by),
            before: Some(json!({ "status": "open" })),
            after: Some(json!({
                "status": "closed",
                "expectedAmount": reconciliation.expected,
                "actualAmount": reconciliation.actual,
                "difference": reconciliation.difference,
            })),
            description: format!("Cash session closed for {}", closed.session_date),
        });

        Ok(closed)
    }

    /// Reopens a closed session on its own calendar day.
    ///
    /// Clears the reconciled state on the session and its ledger rows;
    /// running totals are preserved.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound`, `ReopenAlreadyOpen`, `ReopenNotToday`,
    /// `AnotherSessionOpen`, or a database error.
    pub async fn reopen(
        &self,
        session_id: Uuid,
        today: NaiveDate,
        reopened_by: Uuid,
    ) -> Result<cash_sessions::Model, RepositoryError> {
        let txn = self.db.begin().await?;

        let target = cash_sessions::Entity::find_by_id(session_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RegisterError::SessionNotFound(session_id))?;
        let open = Self::find_open(&txn).await?;
        ensure_can_reopen(today, &snapshot(&target), open.map(|m| snapshot(&m)).as_ref())?;

        let now = Utc::now();
        let previous_difference = target.difference;

        cash_ledger_entries::Entity::update_many()
            .col_expr(
                cash_ledger_entries::Column::ActualAmount,
                sea_orm::sea_query::Expr::value(Option::<Decimal>::None),
            )
            .col_expr(
                cash_ledger_entries::Column::Difference,
                sea_orm::sea_query::Expr::value(Option::<Decimal>::None),
            )
            .col_expr(
                cash_ledger_entries::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(cash_ledger_entries::Column::SessionId.eq(session_id))
            .exec(&txn)
            .await?;

        let reopened = cash_sessions::ActiveModel {
            id: Set(session_id),
            status: Set(CashSessionStatus::Open),
            closed_at: Set(None),
            closed_by: Set(None),
            expected_amount: Set(None),
            actual_amount: Set(None),
            difference: Set(None),
            closing_notes: Set(None),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        self.audit().record(AuditEvent {
            entity_type: "cash_session",
            entity_id: reopened.id,
            action: AuditAction::Update,
            actor: Some(reopened_by),
            before: Some(json!({
                "status": "closed",
                "difference": previous_difference,
            })),
            after: Some(json!({ "status": "open" })),
            description: format!("Cash session reopened for {}", reopened.session_date),
        });

        Ok(reopened)
    }

    /// Returns the currently open session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current(&self) -> Result<Option<cash_sessions::Model>, DbErr> {
        Self::find_open(&self.db).await
    }

    /// Returns the register status relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn status(&self, today: NaiveDate) -> Result<RegisterStatus, DbErr> {
        let open = Self::find_open(&self.db).await?;
        let is_from_previous_day = open.as_ref().is_some_and(|s| s.session_date < today);

        Ok(RegisterStatus {
            has_open_register: open.is_some(),
            is_from_previous_day,
            open_register: open,
        })
    }

    /// Returns the suggested opening float: the cash counted at the most
    /// recent close, or zero when no session has been closed yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn suggested_initial(&self) -> Result<SuggestedInitial, DbErr> {
        let Some(previous) = cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Closed))
            .order_by_desc(cash_sessions::Column::SessionDate)
            .one(&self.db)
            .await?
        else {
            return Ok(SuggestedInitial {
                amount: Decimal::ZERO,
                previous_session_id: None,
                previous_session_date: None,
            });
        };

        let cash_row = cash_ledger_entries::Entity::find()
            .filter(cash_ledger_entries::Column::SessionId.eq(previous.id))
            .find_also_related(payment_methods::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .find(|(_, method)| method.as_ref().is_some_and(|m| m.is_cash))
            .map(|(entry, _)| entry);

        let amount = cash_row.map_or(Decimal::ZERO, |entry| {
            entry.actual_amount.unwrap_or(entry.expected_amount)
        });

        Ok(SuggestedInitial {
            amount,
            previous_session_id: Some(previous.id),
            previous_session_date: Some(previous.session_date),
        })
    }

    /// Loads a session with its ledger lines and movements.
    ///
    /// Movements are ordered by creation time with id as the tie-break.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` or a database error.
    pub async fn find_by_id(&self, id: Uuid) -> Result<SessionDetail, RepositoryError> {
        let session = cash_sessions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RegisterError::SessionNotFound(id))?;

        let ledger = cash_ledger_entries::Entity::find()
            .filter(cash_ledger_entries::Column::SessionId.eq(id))
            .find_also_related(payment_methods::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(entry, method)| {
                method.map(|m| LedgerLine {
                    entry,
                    method_code: m.code,
                    method_name: m.name,
                })
            })
            .collect();

        let movements = super::movement::fetch_for_session(&self.db, id).await?;

        Ok(SessionDetail {
            session,
            ledger,
            movements,
        })
    }

    /// Lists sessions ordered by date descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(
        &self,
        filter: SessionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<cash_sessions::Model>, DbErr> {
        let mut query = cash_sessions::Entity::find();

        if let Some(date) = filter.date {
            query = query.filter(cash_sessions::Column::SessionDate.eq(date));
        } else {
            if let Some(start) = filter.start_date {
                query = query.filter(cash_sessions::Column::SessionDate.gte(start));
            }
            if let Some(end) = filter.end_date {
                query = query.filter(cash_sessions::Column::SessionDate.lte(end));
            }
        }

        let total = query.clone().count(&self.db).await?;
        let sessions = query
            .order_by_desc(cash_sessions::Column::SessionDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(sessions, page.page, page.per_page, total))
    }

    fn audit(&self) -> AuditRepository {
        AuditRepository::new(self.db.clone())
    }

    async fn find_open<C: ConnectionTrait>(
        conn: &C,
    ) -> Result<Option<cash_sessions::Model>, DbErr> {
        cash_sessions::Entity::find()
            .filter(cash_sessions::Column::Status.eq(CashSessionStatus::Open))
            .one(conn)
            .await
    }

    async fn find_by_date<C: ConnectionTrait>(
        conn: &C,
        date: NaiveDate,
    ) -> Result<Option<cash_sessions::Model>, DbErr> {
        cash_sessions::Entity::find()
            .filter(cash_sessions::Column::SessionDate.eq(date))
            .one(conn)
            .await
    }

    /// Builds the full count list: the mandatory cash count first, then
    /// the per-method counts, skipping any duplicate cash entry.
    async fn full_counts(
        txn: &DatabaseTransaction,
        rows: &[(cash_ledger_entries::Model, payment_methods::Model)],
        input: &CloseSessionInput,
    ) -> Result<Vec<CountedAmount>, RepositoryError> {
        let cash_method_id = match rows.iter().find(|(_, m)| m.is_cash) {
            Some((entry, _)) => entry.payment_method_id,
            None => payment_methods::Entity::find()
                .filter(payment_methods::Column::IsCash.eq(true))
                .one(txn)
                .await?
                .map(|m| m.id)
                .ok_or_else(|| DbErr::Custom("payment method catalog has no cash method".into()))?,
        };

        let mut counts = vec![CountedAmount {
            payment_method_id: cash_method_id,
            amount: input.actual_cash_amount,
        }];
        counts.extend(
            input
                .actual_amounts
                .iter()
                .filter(|c| c.payment_method_id != cash_method_id)
                .copied(),
        );
        Ok(counts)
    }

    /// Creates zero ledger rows for counted methods the session has not
    /// tracked yet, so a count on a late-activated method reconciles
    /// instead of erroring.
    async fn ensure_rows_for_counts(
        txn: &DatabaseTransaction,
        rows: &mut Vec<(cash_ledger_entries::Model, payment_methods::Model)>,
        counts: &[CountedAmount],
        session: &cash_sessions::Model,
    ) -> Result<(), RepositoryError> {
        for count in counts {
            if rows
                .iter()
                .any(|(e, _)| e.payment_method_id == count.payment_method_id)
            {
                continue;
            }

            let method = payment_methods::Entity::find_by_id(count.payment_method_id)
                .one(txn)
                .await?
                .ok_or(RegisterError::PaymentMethodNotFound(count.payment_method_id))?;

            let now = Utc::now();
            let entry = cash_ledger_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                session_id: Set(session.id),
                payment_method_id: Set(method.id),
                initial_amount: Set(Decimal::ZERO),
                total_income: Set(Decimal::ZERO),
                total_expense: Set(Decimal::ZERO),
                expected_amount: Set(Decimal::ZERO),
                actual_amount: Set(None),
                difference: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(txn)
            .await?;

            rows.push((entry, method));
        }
        Ok(())
    }
}

fn snapshot(session: &cash_sessions::Model) -> SessionSnapshot {
    SessionSnapshot {
        id: session.id,
        session_date: session.session_date,
        status: session.status.into(),
    }
}

/// Folds a manual float adjustment into the opening notes so the override
/// stays visible to the auditor.
fn compose_opening_notes(
    notes: Option<&str>,
    manually_adjusted: bool,
    adjustment_reason: Option<&str>,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(notes) = notes {
        let notes = notes.trim();
        if !notes.is_empty() {
            parts.push(notes.to_string());
        }
    }

    if manually_adjusted {
        let line = adjustment_reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map_or_else(
                || "Initial amount manually adjusted".to_string(),
                |reason| format!("Initial amount manually adjusted: {reason}"),
            );
        parts.push(line);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_notes_passthrough() {
        assert_eq!(
            compose_opening_notes(Some("morning shift"), false, None),
            Some("morning shift".to_string())
        );
        assert_eq!(compose_opening_notes(None, false, None), None);
        assert_eq!(compose_opening_notes(Some("   "), false, None), None);
    }

    #[test]
    fn test_opening_notes_with_adjustment() {
        assert_eq!(
            compose_opening_notes(None, true, Some("drawer was short yesterday")),
            Some("Initial amount manually adjusted: drawer was short yesterday".to_string())
        );
        assert_eq!(
            compose_opening_notes(Some("morning shift"), true, None),
            Some("morning shift\nInitial amount manually adjusted".to_string())
        );
    }

    #[test]
    fn test_adjustment_reason_ignored_without_flag() {
        assert_eq!(compose_opening_notes(None, false, Some("ignored")), None);
    }
}
