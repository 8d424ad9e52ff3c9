//! Tests for report building.

use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::{PreviousPeriod, ReportService};
use super::types::{MovementRow, SessionOutcome};
use crate::error::RegisterError;
use crate::movement::MovementKind;
use crate::session::SessionStatus;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn closed_session(
    day: u32,
    income: Decimal,
    expense: Decimal,
    difference: Decimal,
) -> SessionOutcome {
    SessionOutcome {
        session_date: date(2026, 3, day),
        status: SessionStatus::Closed,
        total_income: income,
        total_expense: expense,
        difference: Some(difference),
    }
}

fn open_session(day: u32, income: Decimal, expense: Decimal) -> SessionOutcome {
    SessionOutcome {
        session_date: date(2026, 3, day),
        status: SessionStatus::Open,
        total_income: income,
        total_expense: expense,
        difference: None,
    }
}

fn movement(day: u32, code: &str, kind: MovementKind, amount: Decimal) -> MovementRow {
    MovementRow {
        session_date: date(2026, 3, day),
        method_code: code.to_string(),
        method_name: match code {
            "cash" => "Cash".to_string(),
            "card" => "Card".to_string(),
            other => other.to_string(),
        },
        kind,
        amount,
    }
}

#[test]
fn test_summary_totals() {
    let sessions = vec![
        closed_session(1, dec!(5000), dec!(1000), dec!(-200)),
        closed_session(2, dec!(3000), dec!(500), dec!(50)),
        open_session(3, dec!(700), dec!(100)),
    ];

    let report =
        ReportService::cash_flow(date(2026, 3, 1), date(2026, 3, 3), &sessions, &[], None).unwrap();

    assert_eq!(report.summary.total_income, dec!(8700));
    assert_eq!(report.summary.total_expense, dec!(1600));
    assert_eq!(report.summary.net_flow, dec!(7100));
    // Differences and daily average only consider closed sessions.
    assert_eq!(report.summary.total_difference, dec!(-150));
    assert_eq!(report.summary.average_daily_income, dec!(4000));
}

#[test]
fn test_average_daily_income_rounding() {
    let sessions = vec![
        closed_session(1, dec!(100), Decimal::ZERO, Decimal::ZERO),
        closed_session(2, dec!(100), Decimal::ZERO, Decimal::ZERO),
        closed_session(3, dec!(100.01), Decimal::ZERO, Decimal::ZERO),
    ];

    let report =
        ReportService::cash_flow(date(2026, 3, 1), date(2026, 3, 3), &sessions, &[], None).unwrap();

    // 300.01 / 3 = 100.00333... -> 100.00
    assert_eq!(report.summary.average_daily_income, dec!(100.00));
}

#[test]
fn test_empty_period() {
    let report =
        ReportService::cash_flow(date(2026, 3, 1), date(2026, 3, 31), &[], &[], None).unwrap();

    assert_eq!(report.summary.total_income, Decimal::ZERO);
    assert_eq!(report.summary.average_daily_income, Decimal::ZERO);
    assert!(report.by_method.is_empty());
    assert!(report.by_day.is_empty());
    assert!(report.comparison.is_none());
}

#[test]
fn test_by_method_grouping() {
    let movements = vec![
        movement(1, "cash", MovementKind::Income, dec!(1000)),
        movement(1, "cash", MovementKind::Expense, dec!(300)),
        movement(2, "card", MovementKind::Income, dec!(2500)),
        movement(2, "cash", MovementKind::Income, dec!(450)),
    ];

    let report = ReportService::cash_flow(
        date(2026, 3, 1),
        date(2026, 3, 2),
        &[],
        &movements,
        None,
    )
    .unwrap();

    // Ordered by method code: card before cash.
    assert_eq!(report.by_method.len(), 2);
    assert_eq!(report.by_method[0].method_code, "card");
    assert_eq!(report.by_method[0].income, dec!(2500));
    assert_eq!(report.by_method[0].net, dec!(2500));

    assert_eq!(report.by_method[1].method_code, "cash");
    assert_eq!(report.by_method[1].income, dec!(1450));
    assert_eq!(report.by_method[1].expense, dec!(300));
    assert_eq!(report.by_method[1].net, dec!(1150));
}

#[test]
fn test_by_day_ordering() {
    let sessions = vec![
        closed_session(15, dec!(200), dec!(50), Decimal::ZERO),
        closed_session(3, dec!(100), dec!(20), Decimal::ZERO),
        open_session(20, dec!(300), Decimal::ZERO),
    ];

    let report = ReportService::cash_flow(
        date(2026, 3, 1),
        date(2026, 3, 31),
        &sessions,
        &[],
        None,
    )
    .unwrap();

    let dates: Vec<NaiveDate> = report.by_day.iter().map(|d| d.date).collect();
    assert_eq!(dates, vec![date(2026, 3, 3), date(2026, 3, 15), date(2026, 3, 20)]);
    assert_eq!(report.by_day[0].net, dec!(80));
}

#[test]
fn test_comparison_deltas() {
    let current = vec![closed_session(8, dec!(5000), dec!(2000), Decimal::ZERO)];
    let previous = PreviousPeriod {
        start_date: date(2026, 3, 1),
        end_date: date(2026, 3, 7),
        sessions: vec![closed_session(1, dec!(4000), dec!(2500), Decimal::ZERO)],
    };

    let report = ReportService::cash_flow(
        date(2026, 3, 8),
        date(2026, 3, 14),
        &current,
        &[],
        Some(&previous),
    )
    .unwrap();

    let comparison = report.comparison.unwrap();
    assert_eq!(comparison.start_date, date(2026, 3, 1));
    assert_eq!(comparison.end_date, date(2026, 3, 7));
    assert_eq!(comparison.summary.total_income, dec!(4000));
    assert_eq!(comparison.income_change, dec!(1000));
    assert_eq!(comparison.expense_change, dec!(-500));
    assert_eq!(comparison.net_change, dec!(1500));
}

#[test]
fn test_inverted_range_rejected() {
    let result = ReportService::cash_flow(date(2026, 3, 10), date(2026, 3, 1), &[], &[], None);
    assert!(matches!(
        result,
        Err(RegisterError::InvalidDateRange { .. })
    ));
}

#[rstest]
#[case(date(2026, 2, 1), date(2026, 2, 7), date(2026, 1, 25), date(2026, 1, 31))]
#[case(date(2026, 3, 10), date(2026, 3, 10), date(2026, 3, 9), date(2026, 3, 9))]
#[case(date(2026, 1, 1), date(2026, 1, 31), date(2025, 12, 2), date(2025, 12, 31))]
fn test_previous_period(
    #[case] start: NaiveDate,
    #[case] end: NaiveDate,
    #[case] expected_start: NaiveDate,
    #[case] expected_end: NaiveDate,
) {
    let (prev_start, prev_end) = ReportService::previous_period(start, end);
    assert_eq!(prev_start, expected_start);
    assert_eq!(prev_end, expected_end);

    // The previous period always spans the same number of days.
    assert_eq!(
        prev_end.signed_duration_since(prev_start),
        end.signed_duration_since(start)
    );
}

#[test]
fn test_stats() {
    let sessions = vec![
        closed_session(1, dec!(5000), dec!(1000), dec!(-200)),
        closed_session(2, dec!(3000), dec!(500), dec!(500)),
        closed_session(3, dec!(2000), dec!(100), Decimal::ZERO),
        open_session(4, dec!(900), dec!(50)),
    ];

    let stats = ReportService::stats(&sessions);

    assert_eq!(stats.total_sessions, 4);
    assert_eq!(stats.open_sessions, 1);
    assert_eq!(stats.closed_sessions, 3);
    assert_eq!(stats.total_income, dec!(10900));
    assert_eq!(stats.total_expense, dec!(1650));
    assert_eq!(stats.net_flow, dec!(9250));
    assert_eq!(stats.total_difference, dec!(300));
    assert_eq!(stats.average_difference, dec!(100));
    assert_eq!(stats.sessions_with_shortage, 1);
    assert_eq!(stats.sessions_with_surplus, 1);
    assert_eq!(stats.sessions_exact, 1);
}

#[test]
fn test_stats_empty() {
    let stats = ReportService::stats(&[]);
    assert_eq!(stats.total_sessions, 0);
    assert_eq!(stats.average_difference, Decimal::ZERO);
}
