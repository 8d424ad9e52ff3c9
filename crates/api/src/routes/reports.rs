//! Cash register report routes.
//!
//! Read-only aggregation over sessions and movements. The heavy lifting
//! lives in `arqo_core::reports`; handlers here parse the date range,
//! fetch, and reshape the result for the wire.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::AppState;
use arqo_core::reports::{CashFlowReport, DailyFlow, FlowSummary, MethodFlow, SessionStats};
use arqo_db::repositories::{ReportRepository, RepositoryError, StatsFilter};

use super::cash_register::{format_money, internal_error_response, register_error_response};

/// Creates the report routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-register/reports/cash-flow", get(get_cash_flow))
        .route("/cash-register/stats", get(get_stats))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the cash-flow report.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowQuery {
    /// Range start (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Restrict the per-method breakdown to one method code.
    pub payment_method: Option<String>,
    /// Include the immediately preceding period of equal length.
    #[serde(default)]
    pub include_comparison: bool,
}

/// Query parameters for session statistics.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Range start (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive).
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Cash-flow report response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowResponse {
    /// Range start.
    pub start_date: String,
    /// Range end.
    pub end_date: String,
    /// Period totals.
    pub summary: FlowSummaryResponse,
    /// Per-payment-method breakdown, ordered by method code.
    pub by_method: Vec<MethodFlowResponse>,
    /// Per-day breakdown, ordered by date.
    pub by_day: Vec<DailyFlowResponse>,
    /// Previous period, when comparison was requested.
    pub comparison: Option<ComparisonResponse>,
}

/// Period totals in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummaryResponse {
    /// Sum of income across the period.
    pub total_income: String,
    /// Sum of expense across the period.
    pub total_expense: String,
    /// Income minus expense.
    pub net_flow: String,
    /// Sum of reconciled differences over closed sessions.
    pub total_difference: String,
    /// Average daily income over closed sessions.
    pub average_daily_income: String,
}

/// Per-payment-method totals in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodFlowResponse {
    /// Method code.
    pub method_code: String,
    /// Method name.
    pub method_name: String,
    /// Income through this method.
    pub income: String,
    /// Expense through this method.
    pub expense: String,
    /// Income minus expense.
    pub net: String,
}

/// Per-day totals in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFlowResponse {
    /// Business date.
    pub date: String,
    /// Income that day.
    pub income: String,
    /// Expense that day.
    pub expense: String,
    /// Income minus expense.
    pub net: String,
}

/// Previous-period comparison in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    /// Previous period start.
    pub start_date: String,
    /// Previous period end.
    pub end_date: String,
    /// Previous period totals.
    pub summary: FlowSummaryResponse,
    /// Current income minus previous income.
    pub income_change: String,
    /// Current expense minus previous expense.
    pub expense_change: String,
    /// Current net minus previous net.
    pub net_change: String,
}

/// Session statistics response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// All sessions seen.
    pub total_sessions: u64,
    /// Currently open.
    pub open_sessions: u64,
    /// Reconciled and closed.
    pub closed_sessions: u64,
    /// Aggregate income.
    pub total_income: String,
    /// Aggregate expense.
    pub total_expense: String,
    /// Income minus expense.
    pub net_flow: String,
    /// Sum of differences over closed sessions.
    pub total_difference: String,
    /// Average difference over closed sessions.
    pub average_difference: String,
    /// Closed sessions that came up short.
    pub sessions_with_shortage: u64,
    /// Closed sessions that came up over.
    pub sessions_with_surplus: u64,
    /// Closed sessions that balanced exactly.
    pub sessions_exact: u64,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /cash-register/reports/cash-flow
///
/// Income, expense, and net flow over a date range, broken down by
/// payment method and by day.
#[axum::debug_handler]
async fn get_cash_flow(
    State(state): State<AppState>,
    Query(query): Query<CashFlowQuery>,
) -> impl IntoResponse {
    let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_parameter",
                "message": "startDate and endDate are required"
            })),
        )
            .into_response();
    };

    let repo = ReportRepository::new((*state.db).clone());

    match repo
        .cash_flow(
            start,
            end,
            query.payment_method.as_deref(),
            query.include_comparison,
        )
        .await
    {
        Ok(report) => (StatusCode::OK, Json(cash_flow_response(&report))).into_response(),
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to build cash-flow report");
            internal_error_response()
        }
    }
}

/// GET /cash-register/stats
///
/// Session counts and aggregate totals over an optional date range.
#[axum::debug_handler]
async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new((*state.db).clone());

    let filter = StatsFilter {
        start_date: query.start_date,
        end_date: query.end_date,
    };

    match repo.stats(filter).await {
        Ok(stats) => (StatusCode::OK, Json(stats_response(&stats))).into_response(),
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to build session statistics");
            internal_error_response()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts period totals to their response shape.
fn flow_summary_response(summary: &FlowSummary) -> FlowSummaryResponse {
    FlowSummaryResponse {
        total_income: format_money(summary.total_income),
        total_expense: format_money(summary.total_expense),
        net_flow: format_money(summary.net_flow),
        total_difference: format_money(summary.total_difference),
        average_daily_income: format_money(summary.average_daily_income),
    }
}

/// Converts a per-method breakdown row to its response shape.
fn method_flow_response(flow: &MethodFlow) -> MethodFlowResponse {
    MethodFlowResponse {
        method_code: flow.method_code.clone(),
        method_name: flow.method_name.clone(),
        income: format_money(flow.income),
        expense: format_money(flow.expense),
        net: format_money(flow.net),
    }
}

/// Converts a per-day breakdown row to its response shape.
fn daily_flow_response(flow: &DailyFlow) -> DailyFlowResponse {
    DailyFlowResponse {
        date: flow.date.to_string(),
        income: format_money(flow.income),
        expense: format_money(flow.expense),
        net: format_money(flow.net),
    }
}

/// Converts a cash-flow report to its response shape.
fn cash_flow_response(report: &CashFlowReport) -> CashFlowResponse {
    CashFlowResponse {
        start_date: report.start_date.to_string(),
        end_date: report.end_date.to_string(),
        summary: flow_summary_response(&report.summary),
        by_method: report.by_method.iter().map(method_flow_response).collect(),
        by_day: report.by_day.iter().map(daily_flow_response).collect(),
        comparison: report.comparison.as_ref().map(|c| ComparisonResponse {
            start_date: c.start_date.to_string(),
            end_date: c.end_date.to_string(),
            summary: flow_summary_response(&c.summary),
            income_change: format_money(c.income_change),
            expense_change: format_money(c.expense_change),
            net_change: format_money(c.net_change),
        }),
    }
}

/// Converts session statistics to their response shape.
fn stats_response(stats: &SessionStats) -> StatsResponse {
    StatsResponse {
        total_sessions: stats.total_sessions,
        open_sessions: stats.open_sessions,
        closed_sessions: stats.closed_sessions,
        total_income: format_money(stats.total_income),
        total_expense: format_money(stats.total_expense),
        net_flow: format_money(stats.net_flow),
        total_difference: format_money(stats.total_difference),
        average_difference: format_money(stats.average_difference),
        sessions_with_shortage: stats.sessions_with_shortage,
        sessions_with_surplus: stats.sessions_with_surplus,
        sessions_exact: stats.sessions_exact,
    }
}
