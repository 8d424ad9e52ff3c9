//! Cash session lifecycle rules.
//!
//! A session is one calendar day at the register: OPEN -> CLOSED via close,
//! CLOSED -> OPEN via same-day reopen. No terminal state; a session can cycle
//! within its day. At most one session is OPEN system-wide and at most one
//! session exists per date. The guards here are pure; the repository runs
//! them inside the transaction that also performs the writes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RegisterError;

/// Status of a cash session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The register is operating under this session.
    Open,
    /// The session has been reconciled and closed.
    Closed,
}

impl SessionStatus {
    /// Returns the lowercase string form used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice of an existing session the lifecycle guards need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Session id.
    pub id: Uuid,
    /// The session's business date.
    pub session_date: NaiveDate,
    /// Current status.
    pub status: SessionStatus,
}

/// Checks that a new session may be opened.
///
/// `open_session` is whatever session currently holds the register open
/// (any date); `todays_session` is the session row for today's date, if one
/// exists. The two conflicts carry distinct messages: an open session blocks
/// outright, while a closed session for today must be reopened instead.
///
/// # Errors
///
/// Returns `AlreadyOpen` or `AlreadyClosedToday`.
pub fn ensure_can_open(
    open_session: Option<&SessionSnapshot>,
    todays_session: Option<&SessionSnapshot>,
) -> Result<(), RegisterError> {
    if let Some(open) = open_session {
        return Err(RegisterError::AlreadyOpen(open.id));
    }
    if let Some(existing) = todays_session {
        return Err(RegisterError::AlreadyClosedToday(existing.id));
    }
    Ok(())
}

/// Checks that the resolved session can still be closed.
///
/// The repository resolves the open session before calling this; a closed
/// status here means a concurrent close won the race.
///
/// # Errors
///
/// Returns `NoOpenSession` if the session is no longer open.
pub fn ensure_can_close(session: &SessionSnapshot) -> Result<(), RegisterError> {
    match session.status {
        SessionStatus::Open => Ok(()),
        SessionStatus::Closed => Err(RegisterError::NoOpenSession),
    }
}

/// Checks that `target` may be reopened today.
///
/// # Errors
///
/// Returns `ReopenAlreadyOpen`, `ReopenNotToday`, or `AnotherSessionOpen`.
pub fn ensure_can_reopen(
    today: NaiveDate,
    target: &SessionSnapshot,
    open_session: Option<&SessionSnapshot>,
) -> Result<(), RegisterError> {
    if target.status == SessionStatus::Open {
        return Err(RegisterError::ReopenAlreadyOpen(target.id));
    }
    if target.session_date != today {
        return Err(RegisterError::ReopenNotToday {
            session_date: target.session_date,
        });
    }
    if let Some(open) = open_session {
        return Err(RegisterError::AnotherSessionOpen(open.id));
    }
    Ok(())
}

/// Validates the opening float.
///
/// Zero is allowed (a drawer can legitimately start empty); negative is not.
///
/// # Errors
///
/// Returns `NegativeAmount` for negative values.
pub fn validate_initial_amount(amount: Decimal) -> Result<(), RegisterError> {
    if amount < Decimal::ZERO {
        return Err(RegisterError::NegativeAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(status: SessionStatus, date: NaiveDate) -> SessionSnapshot {
        SessionSnapshot {
            id: Uuid::new_v4(),
            session_date: date,
            status,
        }
    }

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    #[test]
    fn test_open_with_clear_register() {
        assert!(ensure_can_open(None, None).is_ok());
    }

    #[test]
    fn test_open_blocked_by_open_session() {
        let open = snapshot(SessionStatus::Open, jan(15));
        let result = ensure_can_open(Some(&open), Some(&open));
        assert_eq!(result, Err(RegisterError::AlreadyOpen(open.id)));
    }

    #[test]
    fn test_open_blocked_by_stale_open_session() {
        // Yesterday's session never closed; it still blocks today's open.
        let stale = snapshot(SessionStatus::Open, jan(14));
        let result = ensure_can_open(Some(&stale), None);
        assert_eq!(result, Err(RegisterError::AlreadyOpen(stale.id)));
    }

    #[test]
    fn test_open_blocked_by_closed_session_today() {
        let closed = snapshot(SessionStatus::Closed, jan(15));
        let result = ensure_can_open(None, Some(&closed));
        assert_eq!(result, Err(RegisterError::AlreadyClosedToday(closed.id)));
    }

    #[test]
    fn test_close_open_session() {
        let open = snapshot(SessionStatus::Open, jan(15));
        assert!(ensure_can_close(&open).is_ok());
    }

    #[test]
    fn test_close_lost_race() {
        let closed = snapshot(SessionStatus::Closed, jan(15));
        assert_eq!(ensure_can_close(&closed), Err(RegisterError::NoOpenSession));
    }

    #[test]
    fn test_reopen_same_day() {
        let closed = snapshot(SessionStatus::Closed, jan(15));
        assert!(ensure_can_reopen(jan(15), &closed, None).is_ok());
    }

    #[test]
    fn test_reopen_target_still_open() {
        let open = snapshot(SessionStatus::Open, jan(15));
        let result = ensure_can_reopen(jan(15), &open, Some(&open));
        assert_eq!(result, Err(RegisterError::ReopenAlreadyOpen(open.id)));
    }

    #[test]
    fn test_reopen_yesterdays_session() {
        let closed = snapshot(SessionStatus::Closed, jan(14));
        let result = ensure_can_reopen(jan(15), &closed, None);
        assert_eq!(
            result,
            Err(RegisterError::ReopenNotToday {
                session_date: jan(14)
            })
        );
    }

    #[test]
    fn test_reopen_blocked_by_other_open_session() {
        let closed = snapshot(SessionStatus::Closed, jan(15));
        let other = snapshot(SessionStatus::Open, jan(15));
        let result = ensure_can_reopen(jan(15), &closed, Some(&other));
        assert_eq!(result, Err(RegisterError::AnotherSessionOpen(other.id)));
    }

    #[test]
    fn test_initial_amount_validation() {
        assert!(validate_initial_amount(dec!(10000)).is_ok());
        assert!(validate_initial_amount(Decimal::ZERO).is_ok());
        assert_eq!(
            validate_initial_amount(dec!(-0.01)),
            Err(RegisterError::NegativeAmount)
        );
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(SessionStatus::Open.as_str(), "open");
        assert_eq!(SessionStatus::Closed.to_string(), "closed");
    }
}
