//! Report generation service.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{
    CashFlowReport, DailyFlow, FlowSummary, MethodFlow, MovementRow, PeriodComparison,
    SessionOutcome, SessionStats,
};
use crate::error::RegisterError;
use crate::session::SessionStatus;

/// Rows for the immediately preceding period, when comparison is requested.
#[derive(Debug, Clone)]
pub struct PreviousPeriod {
    /// Previous period start.
    pub start_date: NaiveDate,
    /// Previous period end.
    pub end_date: NaiveDate,
    /// Session outcomes within the previous period.
    pub sessions: Vec<SessionOutcome>,
}

/// Service for building cash-register reports.
pub struct ReportService;

impl ReportService {
    /// Validates that `start` does not come after `end`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when the range is inverted.
    pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), RegisterError> {
        if start > end {
            return Err(RegisterError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Returns the immediately preceding period of equal length.
    ///
    /// The span is `end - start`; the previous period ends the day before
    /// `start` and covers the same number of days.
    #[must_use]
    pub fn previous_period(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        let span = end.signed_duration_since(start);
        let prev_end = start - Duration::days(1);
        let prev_start = prev_end - span;
        (prev_start, prev_end)
    }

    /// Builds the cash-flow report for a period.
    ///
    /// `sessions` and `movements` must already be filtered to the range (and
    /// payment method, when a method filter applies). The per-day breakdown
    /// comes from session aggregates (one session per date); the per-method
    /// breakdown comes from the movement rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start > end`.
    pub fn cash_flow(
        start: NaiveDate,
        end: NaiveDate,
        sessions: &[SessionOutcome],
        movements: &[MovementRow],
        previous: Option<&PreviousPeriod>,
    ) -> Result<CashFlowReport, RegisterError> {
        Self::validate_range(start, end)?;

        let summary = Self::summarize(sessions);
        let by_method = Self::group_by_method(movements);
        let by_day = Self::group_by_day(sessions);

        let comparison = previous.map(|prev| {
            let prev_summary = Self::summarize(&prev.sessions);
            PeriodComparison {
                start_date: prev.start_date,
                end_date: prev.end_date,
                income_change: summary.total_income - prev_summary.total_income,
                expense_change: summary.total_expense - prev_summary.total_expense,
                net_change: summary.net_flow - prev_summary.net_flow,
                summary: prev_summary,
            }
        });

        Ok(CashFlowReport {
            start_date: start,
            end_date: end,
            summary,
            by_method,
            by_day,
            comparison,
        })
    }

    /// Builds session statistics from outcome rows.
    #[must_use]
    pub fn stats(sessions: &[SessionOutcome]) -> SessionStats {
        let mut stats = SessionStats {
            total_sessions: sessions.len() as u64,
            open_sessions: 0,
            closed_sessions: 0,
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net_flow: Decimal::ZERO,
            total_difference: Decimal::ZERO,
            average_difference: Decimal::ZERO,
            sessions_with_shortage: 0,
            sessions_with_surplus: 0,
            sessions_exact: 0,
        };

        for session in sessions {
            stats.total_income += session.total_income;
            stats.total_expense += session.total_expense;

            match session.status {
                SessionStatus::Open => stats.open_sessions += 1,
                SessionStatus::Closed => {
                    stats.closed_sessions += 1;
                    let difference = session.difference.unwrap_or(Decimal::ZERO);
                    stats.total_difference += difference;
                    if difference < Decimal::ZERO {
                        stats.sessions_with_shortage += 1;
                    } else if difference > Decimal::ZERO {
                        stats.sessions_with_surplus += 1;
                    } else {
                        stats.sessions_exact += 1;
                    }
                }
            }
        }

        stats.net_flow = stats.total_income - stats.total_expense;
        stats.average_difference = average(stats.total_difference, stats.closed_sessions);
        stats
    }

    fn summarize(sessions: &[SessionOutcome]) -> FlowSummary {
        let mut summary = FlowSummary::default();
        let mut closed_income = Decimal::ZERO;
        let mut closed_count: u64 = 0;

        for session in sessions {
            summary.total_income += session.total_income;
            summary.total_expense += session.total_expense;

            if session.status == SessionStatus::Closed {
                closed_count += 1;
                closed_income += session.total_income;
                summary.total_difference += session.difference.unwrap_or(Decimal::ZERO);
            }
        }

        summary.net_flow = summary.total_income - summary.total_expense;
        summary.average_daily_income = average(closed_income, closed_count);
        summary
    }

    fn group_by_method(movements: &[MovementRow]) -> Vec<MethodFlow> {
        let mut by_code: BTreeMap<&str, MethodFlow> = BTreeMap::new();

        for row in movements {
            let flow = by_code
                .entry(row.method_code.as_str())
                .or_insert_with(|| MethodFlow {
                    method_code: row.method_code.clone(),
                    method_name: row.method_name.clone(),
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                    net: Decimal::ZERO,
                });

            match row.kind {
                crate::movement::MovementKind::Income => flow.income += row.amount,
                crate::movement::MovementKind::Expense => flow.expense += row.amount,
            }
        }

        let mut flows: Vec<MethodFlow> = by_code.into_values().collect();
        for flow in &mut flows {
            flow.net = flow.income - flow.expense;
        }
        flows
    }

    fn group_by_day(sessions: &[SessionOutcome]) -> Vec<DailyFlow> {
        // One session per date, so the session aggregate is the day's flow.
        let mut days: Vec<DailyFlow> = sessions
            .iter()
            .map(|s| DailyFlow {
                date: s.session_date,
                income: s.total_income,
                expense: s.total_expense,
                net: s.total_income - s.total_expense,
            })
            .collect();
        days.sort_by_key(|d| d.date);
        days
    }
}

/// Banker's-rounded average to cents; zero when the divisor is zero.
fn average(total: Decimal, count: u64) -> Decimal {
    total
        .checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
