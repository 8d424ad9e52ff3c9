//! Domain error type for cash-register operations.
//!
//! Every rule violation a client can trigger maps to one variant here,
//! with a stable machine-readable code and an HTTP status. Infrastructure
//! failures are wrapped at the repository layer, not here.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by cash-register business rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    // ========== Validation Errors ==========
    /// Amount must be greater than zero.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Movement type is not one of income/expense.
    #[error("Invalid movement type: {0}")]
    InvalidMovementType(String),

    /// Start date is after end date.
    #[error("Invalid date range: {start} to {end}")]
    InvalidDateRange {
        /// Requested range start.
        start: NaiveDate,
        /// Requested range end.
        end: NaiveDate,
    },

    /// Manual movements must say what they are for.
    #[error("Manual movements require a description")]
    MissingDescription,

    // ========== Conflict Errors ==========
    /// A session is already open.
    #[error("A cash session is already open: {0}")]
    AlreadyOpen(Uuid),

    /// Today's session exists but is closed; it must be reopened, not re-created.
    #[error("Today's cash session {0} is already closed, reopen it instead")]
    AlreadyClosedToday(Uuid),

    /// Sessions can only be reopened on their own calendar day.
    #[error("Session from {session_date} can only be reopened on the same day")]
    ReopenNotToday {
        /// The target session's business date.
        session_date: NaiveDate,
    },

    /// The reopen target is not closed.
    #[error("Session {0} is not closed")]
    ReopenAlreadyOpen(Uuid),

    /// A different session holds the register open.
    #[error("Another cash session is currently open: {0}")]
    AnotherSessionOpen(Uuid),

    // ========== Not Found Errors ==========
    /// No session is currently open.
    #[error("No open cash session")]
    NoOpenSession,

    /// Session id does not exist.
    #[error("Cash session not found: {0}")]
    SessionNotFound(Uuid),

    /// Payment method id does not resolve.
    #[error("Payment method not found: {0}")]
    PaymentMethodNotFound(Uuid),
}

impl RegisterError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "zero_amount",
            Self::NegativeAmount => "negative_amount",
            Self::InvalidMovementType(_) => "invalid_movement_type",
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::MissingDescription => "missing_description",
            Self::AlreadyOpen(_) => "session_already_open",
            Self::AlreadyClosedToday(_) => "session_already_closed_today",
            Self::ReopenNotToday { .. } => "reopen_not_same_day",
            Self::ReopenAlreadyOpen(_) => "session_not_closed",
            Self::AnotherSessionOpen(_) => "another_session_open",
            Self::NoOpenSession => "no_open_session",
            Self::SessionNotFound(_) => "session_not_found",
            Self::PaymentMethodNotFound(_) => "payment_method_not_found",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::ZeroAmount
            | Self::NegativeAmount
            | Self::InvalidMovementType(_)
            | Self::InvalidDateRange { .. }
            | Self::MissingDescription => 400,

            // 404 Not Found
            Self::NoOpenSession | Self::SessionNotFound(_) | Self::PaymentMethodNotFound(_) => 404,

            // 409 Conflict - lifecycle rule violations
            Self::AlreadyOpen(_)
            | Self::AlreadyClosedToday(_)
            | Self::ReopenNotToday { .. }
            | Self::ReopenAlreadyOpen(_)
            | Self::AnotherSessionOpen(_) => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RegisterError::ZeroAmount.error_code(), "zero_amount");
        assert_eq!(RegisterError::NoOpenSession.error_code(), "no_open_session");
        assert_eq!(
            RegisterError::AlreadyOpen(Uuid::nil()).error_code(),
            "session_already_open"
        );
        assert_eq!(
            RegisterError::AlreadyClosedToday(Uuid::nil()).error_code(),
            "session_already_closed_today"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(RegisterError::NegativeAmount.http_status_code(), 400);
        assert_eq!(RegisterError::MissingDescription.http_status_code(), 400);
        assert_eq!(RegisterError::NoOpenSession.http_status_code(), 404);
        assert_eq!(
            RegisterError::SessionNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            RegisterError::AlreadyOpen(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            RegisterError::ReopenNotToday {
                session_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            }
            .http_status_code(),
            409
        );
    }

    #[test]
    fn test_error_display() {
        let err = RegisterError::ReopenNotToday {
            session_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Session from 2026-01-15 can only be reopened on the same day"
        );

        let err = RegisterError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert_eq!(err.to_string(), "Invalid date range: 2026-02-01 to 2026-01-01");
    }
}
