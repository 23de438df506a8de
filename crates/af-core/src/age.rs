//! Age calculation
//!
//! The single authoritative age rule: whole calendar years elapsed
//! between a birth date and a snapshot date. A year counts as elapsed
//! only once the snapshot's (month, day) has reached the birth
//! (month, day). A birth date after the snapshot date yields 0, never
//! a negative value.

use crate::error::{CoreError, CoreResult};
use chrono::{Datelike, NaiveDate};

/// Compute the age in whole calendar years at `snapshot_date`.
pub fn calculate_age(birth_date: NaiveDate, snapshot_date: NaiveDate) -> i32 {
    if birth_date > snapshot_date {
        return 0;
    }

    let mut age = snapshot_date.year() - birth_date.year();
    if (snapshot_date.month(), snapshot_date.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    age.max(0)
}

/// Parse a `YYYY-MM-DD` date literal.
pub fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CoreError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_age_birthday_already_passed() {
        assert_eq!(calculate_age(date("1990-05-15"), date("2024-01-15")), 33);
    }

    #[test]
    fn test_age_birthday_not_yet_reached() {
        assert_eq!(calculate_age(date("1990-06-15"), date("2024-01-15")), 33);
    }

    #[test]
    fn test_age_on_birthday() {
        // The year counts as elapsed on the birthday itself
        assert_eq!(calculate_age(date("1990-01-15"), date("2024-01-15")), 34);
    }

    #[test]
    fn test_age_day_before_birthday() {
        assert_eq!(calculate_age(date("1990-01-16"), date("2024-01-15")), 33);
    }

    #[test]
    fn test_age_future_birth_date_clamped() {
        assert_eq!(calculate_age(date("2025-01-01"), date("2024-01-15")), 0);
    }

    #[test]
    fn test_age_same_day() {
        assert_eq!(calculate_age(date("2024-01-15"), date("2024-01-15")), 0);
    }

    #[test]
    fn test_age_never_negative() {
        assert_eq!(calculate_age(date("2030-12-31"), date("2024-01-01")), 0);
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }
}
