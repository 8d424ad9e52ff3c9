//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::movement::MovementKind;
use crate::session::SessionStatus;

/// A session's outcome row, as fetched for report building.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Business date.
    pub session_date: NaiveDate,
    /// Open or closed.
    pub status: SessionStatus,
    /// Aggregate income.
    pub total_income: Decimal,
    /// Aggregate expense.
    pub total_expense: Decimal,
    /// Reconciled difference; only present on closed sessions.
    pub difference: Option<Decimal>,
}

/// A flattened movement row, as fetched for report building.
#[derive(Debug, Clone)]
pub struct MovementRow {
    /// Business date of the owning session.
    pub session_date: NaiveDate,
    /// Payment method code.
    pub method_code: String,
    /// Payment method name.
    pub method_name: String,
    /// Direction.
    pub kind: MovementKind,
    /// Amount.
    pub amount: Decimal,
}

/// Period totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowSummary {
    /// Sum of income across the period.
    pub total_income: Decimal,
    /// Sum of expense across the period.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net_flow: Decimal,
    /// Sum of reconciled differences over closed sessions.
    pub total_difference: Decimal,
    /// Average daily income over closed sessions.
    pub average_daily_income: Decimal,
}

/// Per-payment-method totals within the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodFlow {
    /// Method code.
    pub method_code: String,
    /// Method name.
    pub method_name: String,
    /// Income through this method.
    pub income: Decimal,
    /// Expense through this method.
    pub expense: Decimal,
    /// Income minus expense.
    pub net: Decimal,
}

/// Per-day totals within the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyFlow {
    /// Business date.
    pub date: NaiveDate,
    /// Income that day.
    pub income: Decimal,
    /// Expense that day.
    pub expense: Decimal,
    /// Income minus expense.
    pub net: Decimal,
}

/// The immediately preceding period of equal length, with deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparison {
    /// Previous period start.
    pub start_date: NaiveDate,
    /// Previous period end.
    pub end_date: NaiveDate,
    /// Previous period totals.
    pub summary: FlowSummary,
    /// Current income minus previous income.
    pub income_change: Decimal,
    /// Current expense minus previous expense.
    pub expense_change: Decimal,
    /// Current net minus previous net.
    pub net_change: Decimal,
}

/// Cash-flow report over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Range start.
    pub start_date: NaiveDate,
    /// Range end.
    pub end_date: NaiveDate,
    /// Period totals.
    pub summary: FlowSummary,
    /// Per-payment-method breakdown, ordered by method code.
    pub by_method: Vec<MethodFlow>,
    /// Per-day breakdown, ordered by date.
    pub by_day: Vec<DailyFlow>,
    /// Previous period, when comparison was requested.
    pub comparison: Option<PeriodComparison>,
}

/// Session statistics over an optional date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// All sessions seen.
    pub total_sessions: u64,
    /// Currently open.
    pub open_sessions: u64,
    /// Reconciled and closed.
    pub closed_sessions: u64,
    /// Aggregate income.
    pub total_income: Decimal,
    /// Aggregate expense.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net_flow: Decimal,
    /// Sum of differences over closed sessions.
    pub total_difference: Decimal,
    /// Average difference over closed sessions.
    pub average_difference: Decimal,
    /// Closed sessions that came up short.
    pub sessions_with_shortage: u64,
    /// Closed sessions that came up over.
    pub sessions_with_surplus: u64,
    /// Closed sessions that balanced exactly.
    pub sessions_exact: u64,
}
