//! Business-day helpers.
//!
//! A register day is the calendar date in the store's timezone, not UTC.
//! Every "today" decision (open, close, reopen eligibility) goes through
//! here so a store in Guadalajara does not roll its day over at 6pm.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Error returned for unrecognized timezone names.
#[derive(Debug, Error)]
#[error("unknown IANA timezone: {0}")]
pub struct TimezoneError(String);

/// Parses an IANA timezone name (e.g. "America/Mexico_City").
///
/// # Errors
///
/// Returns `TimezoneError` if the name is not a known IANA timezone.
pub fn parse_timezone(name: &str) -> Result<Tz, TimezoneError> {
    name.parse::<Tz>()
        .map_err(|_| TimezoneError(name.to_string()))
}

/// Returns the current calendar date in the given timezone.
#[must_use]
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("UTC")]
    #[case("America/Mexico_City")]
    #[case("Europe/Madrid")]
    fn test_parse_known_timezones(#[case] name: &str) {
        assert!(parse_timezone(name).is_ok());
    }

    #[test]
    fn test_parse_unknown_timezone() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_today_in_utc_matches_utc_date() {
        // Sample before and after to avoid a race at midnight.
        let before = Utc::now().date_naive();
        let today = today_in(chrono_tz::UTC);
        let after = Utc::now().date_naive();

        assert!(today == before || today == after);
    }
}
