//! Shared field validation helpers.
//!
//! Single-field rules (email format, lengths) live on the DTOs as
//! `validator` attributes; the cross-field and domain rules live here.

use crate::error::CoreError;
use crate::types::Date;

/// Validate that a percentage figure falls within `[0.0, 100.0]`.
///
/// Used for Saudization and Iktva figures, which are stored, never computed.
pub fn validate_percentage(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// Validate that an optional end date does not precede its start date.
pub fn validate_date_range(
    start: Option<Date>,
    end: Option<Date>,
    start_name: &str,
    end_name: &str,
) -> Result<(), CoreError> {
    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            return Err(CoreError::Validation(format!(
                "{end_name} ({e}) must not be before {start_name} ({s})"
            )));
        }
    }
    Ok(())
}

/// Validate a year-to-date safety counter.
pub fn validate_counter(value: i32, name: &str) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Reject strings that are empty after trimming.
pub fn require_non_empty(value: &str, name: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn percentage_accepts_boundaries() {
        assert!(validate_percentage(0.0, "iktva").is_ok());
        assert!(validate_percentage(100.0, "iktva").is_ok());
        assert!(validate_percentage(-0.1, "iktva").is_err());
        assert!(validate_percentage(100.1, "iktva").is_err());
        assert!(validate_percentage(f64::NAN, "iktva").is_err());
    }

    #[test]
    fn date_range_rejects_inverted_window() {
        assert!(validate_date_range(Some(d(2026, 1, 1)), Some(d(2026, 1, 1)), "a", "b").is_ok());
        assert!(validate_date_range(Some(d(2026, 1, 2)), Some(d(2026, 1, 1)), "a", "b").is_err());
        assert!(validate_date_range(None, Some(d(2026, 1, 1)), "a", "b").is_ok());
    }

    #[test]
    fn counter_and_non_empty() {
        assert!(validate_counter(0, "ytd_fai").is_ok());
        assert!(validate_counter(-1, "ytd_fai").is_err());
        assert!(require_non_empty("  ", "name").is_err());
        assert!(require_non_empty("x", "name").is_ok());
    }
}
