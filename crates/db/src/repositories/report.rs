//! Report repository.
//!
//! Fetches session outcomes and flattened movement rows for a period and
//! hands the aggregation to the pure report service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};

use arqo_core::reports::{
    CashFlowReport, MovementRow, PreviousPeriod, ReportService, SessionOutcome, SessionStats,
};

use crate::entities::sea_orm_active_enums::CashMovementType;
use crate::entities::{cash_movements, cash_sessions, payment_methods};

use super::RepositoryError;

/// Optional date bounds for session statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsFilter {
    /// Inclusive start date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date.
    pub end_date: Option<NaiveDate>,
}

/// Repository for read-only report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the cash-flow report for `start..=end`.
    ///
    /// `payment_method` narrows the movement breakdown to one method code.
    /// `compare` adds the immediately preceding period of equal length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` or a database error.
    pub async fn cash_flow(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        payment_method: Option<&str>,
        compare: bool,
    ) -> Result<CashFlowReport, RepositoryError> {
        ReportService::validate_range(start, end)?;

        let sessions = self.session_outcomes(Some(start), Some(end)).await?;
        let movements = self.movement_rows(start, end, payment_method).await?;

        let previous = if compare {
            let (prev_start, prev_end) = ReportService::previous_period(start, end);
            let prev_sessions = self
                .session_outcomes(Some(prev_start), Some(prev_end))
                .await?;
            Some(PreviousPeriod {
                start_date: prev_start,
                end_date: prev_end,
                sessions: prev_sessions,
            })
        } else {
            None
        };

        let report =
            ReportService::cash_flow(start, end, &sessions, &movements, previous.as_ref())?;
        Ok(report)
    }

    /// Builds session statistics over an optional date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when both bounds are given out of order,
    /// or a database error.
    pub async fn stats(&self, filter: StatsFilter) -> Result<SessionStats, RepositoryError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            ReportService::validate_range(start, end)?;
        }

        let sessions = self
            .session_outcomes(filter.start_date, filter.end_date)
            .await?;
        Ok(ReportService::stats(&sessions))
    }

    async fn session_outcomes(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<SessionOutcome>, DbErr> {
        let mut query = cash_sessions::Entity::find();
        if let Some(start) = start {
            query = query.filter(cash_sessions::Column::SessionDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(cash_sessions::Column::SessionDate.lte(end));
        }

        let rows = query
            .order_by_asc(cash_sessions::Column::SessionDate)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|session| SessionOutcome {
                session_date: session.session_date,
                status: session.status.into(),
                total_income: session.total_income,
                total_expense: session.total_expense,
                difference: session.difference,
            })
            .collect())
    }

    async fn movement_rows(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        payment_method: Option<&str>,
    ) -> Result<Vec<MovementRow>, DbErr> {
        use sea_orm::FromQueryResult;

        // Movement columns come through under their own names; the joined
        // session date and method columns are aliased.
        #[derive(Debug, FromQueryResult)]
        struct FlatMovement {
            movement_type: CashMovementType,
            amount: Decimal,
            session_date: NaiveDate,
            method_code: String,
            method_name: String,
        }

        let mut query = cash_movements::Entity::find()
            .join(
                JoinType::InnerJoin,
                cash_movements::Relation::CashSessions.def(),
            )
            .join(
                JoinType::InnerJoin,
                cash_movements::Relation::PaymentMethods.def(),
            )
            .column_as(cash_sessions::Column::SessionDate, "session_date")
            .column_as(payment_methods::Column::Code, "method_code")
            .column_as(payment_methods::Column::Name, "method_name")
            .filter(cash_sessions::Column::SessionDate.gte(start))
            .filter(cash_sessions::Column::SessionDate.lte(end));

        if let Some(code) = payment_method {
            query = query.filter(payment_methods::Column::Code.eq(code));
        }

        let rows: Vec<FlatMovement> = query
            .order_by_asc(cash_sessions::Column::SessionDate)
            .into_model::<FlatMovement>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| MovementRow {
                session_date: row.session_date,
                method_code: row.method_code,
                method_name: row.method_name,
                kind: row.movement_type.into(),
                amount: row.amount,
            })
            .collect())
    }
}
