//! Date-window helpers for contractor schedules and credential expiry.

use chrono::Duration;

use crate::types::Date;

/// Default look-ahead for the "upcoming work" view.
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Default look-ahead for certificate and pre-qualification expiry warnings.
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Upper bound accepted for any look-ahead window.
pub const MAX_WINDOW_DAYS: i64 = 366;

/// Clamp a caller-supplied window length to `1..=MAX_WINDOW_DAYS`.
pub fn clamp_window(days: Option<i64>, default: i64) -> i64 {
    days.unwrap_or(default).clamp(1, MAX_WINDOW_DAYS)
}

/// Whether a scheduled window touches `[today, today + days]`.
///
/// A schedule is upcoming when it starts inside the window, ends inside the
/// window, or spans the whole window. A missing bound is treated as open on
/// that side, and a schedule with neither bound is never upcoming.
pub fn is_upcoming(start: Option<Date>, end: Option<Date>, today: Date, days: i64) -> bool {
    let horizon = today + Duration::days(days);
    let within = |d: Date| d >= today && d <= horizon;

    match (start, end) {
        (None, None) => false,
        (Some(s), None) => s <= horizon,
        (None, Some(e)) => e >= today,
        (Some(s), Some(e)) => within(s) || within(e) || (s <= today && e >= horizon),
    }
}

/// Whether `expiry` falls on or before `today + days` (already-expired
/// dates included).
pub fn expires_within(expiry: Option<Date>, today: Date, days: i64) -> bool {
    match expiry {
        Some(d) => d <= today + Duration::days(days),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn start_inside_window_is_upcoming() {
        let today = d(2026, 3, 1);
        assert!(is_upcoming(Some(d(2026, 3, 5)), Some(d(2026, 4, 1)), today, 7));
    }

    #[test]
    fn end_inside_window_is_upcoming() {
        let today = d(2026, 3, 1);
        assert!(is_upcoming(Some(d(2026, 2, 1)), Some(d(2026, 3, 3)), today, 7));
    }

    #[test]
    fn spanning_window_is_upcoming() {
        let today = d(2026, 3, 1);
        assert!(is_upcoming(Some(d(2026, 1, 1)), Some(d(2026, 12, 31)), today, 7));
    }

    #[test]
    fn finished_or_far_future_is_not_upcoming() {
        let today = d(2026, 3, 1);
        assert!(!is_upcoming(Some(d(2026, 1, 1)), Some(d(2026, 2, 27)), today, 7));
        assert!(!is_upcoming(Some(d(2026, 3, 20)), Some(d(2026, 4, 1)), today, 7));
        assert!(!is_upcoming(None, None, today, 7));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let today = d(2026, 3, 1);
        assert!(is_upcoming(Some(d(2026, 3, 8)), Some(d(2026, 3, 20)), today, 7));
        assert!(!is_upcoming(Some(d(2026, 3, 9)), Some(d(2026, 3, 20)), today, 7));
    }

    #[test]
    fn expiry_window_includes_past_dates() {
        let today = d(2026, 3, 1);
        assert!(expires_within(Some(d(2026, 2, 1)), today, 30));
        assert!(expires_within(Some(d(2026, 3, 31)), today, 30));
        assert!(!expires_within(Some(d(2026, 4, 1)), today, 30));
        assert!(!expires_within(None, today, 30));
    }

    #[test]
    fn clamp_window_bounds() {
        assert_eq!(clamp_window(None, DEFAULT_UPCOMING_DAYS), 7);
        assert_eq!(clamp_window(Some(0), 7), 1);
        assert_eq!(clamp_window(Some(10_000), 7), MAX_WINDOW_DAYS);
    }
}
