//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Format a datetime for display.
pub fn format_datetime(dt: &DateTime<Utc>, pretty: bool) -> String {
    if pretty {
        dt.format("%Y-%m-%d %H:%M UTC").to_string()
    } else {
        dt.to_rfc3339()
    }
}

/// Calendar date only, as used for due dates.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Fines are whole currency units.
pub fn format_fine(amount: i64) -> String {
    amount.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("Clean Code", 20), "Clean Code");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("Introduction to Algorithms", 12), "Introduct...");
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_format_datetime_modes() {
        let dt = Utc.with_ymd_and_hms(2025, 4, 2, 7, 5, 0).unwrap();
        assert_eq!(format_datetime(&dt, true), "2025-04-02 07:05 UTC");
        assert_eq!(format_datetime(&dt, false), "2025-04-02T07:05:00+00:00");
        assert_eq!(format_date(&dt), "2025-04-02");
    }
}
