//! Display Formatting
//!
//! Small pure helpers shared by the view builders: visit durations,
//! the people-count label and the last-update clock.

use chrono::NaiveTime;

/// Text shown for a zero or unknown duration
pub const ZERO_DURATION: &str = "0 мин";

/// Format a duration given in minutes.
///
/// Zero, NaN and absent values render as [`ZERO_DURATION`]. Anything else is
/// floored to whole minutes; an hour or more is split into hours and the
/// remaining minutes.
///
/// ```
/// use roomwatch::format::format_duration;
///
/// assert_eq!(format_duration(Some(45.0)), "45мин");
/// assert_eq!(format_duration(Some(65.0)), "1ч 5мин");
/// assert_eq!(format_duration(None), "0 мин");
/// ```
pub fn format_duration(minutes: Option<f64>) -> String {
    let minutes = match minutes {
        Some(m) if m != 0.0 && !m.is_nan() => m.floor() as i64,
        _ => return ZERO_DURATION.to_string(),
    };

    if minutes >= 60 {
        format!("{}ч {}мин", minutes / 60, minutes % 60)
    } else {
        format!("{}мин", minutes)
    }
}

/// Label placed after a room's people count.
///
/// Only the 1 / 2-4 / other split is applied, so 12 reads "человека"
/// and 21 reads "человек".
pub fn people_label(count: u64) -> &'static str {
    match count {
        1 => "человек",
        2..=4 => "человека",
        _ => "человек",
    }
}

/// Format a wall-clock time for the last-update indicator (`HH:MM:SS`)
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_missing_duration() {
        assert_eq!(format_duration(Some(0.0)), "0 мин");
        assert_eq!(format_duration(None), "0 мин");
        assert_eq!(format_duration(Some(f64::NAN)), "0 мин");
    }

    #[test]
    fn test_minutes_only() {
        assert_eq!(format_duration(Some(45.0)), "45мин");
        assert_eq!(format_duration(Some(59.99)), "59мин");
    }

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(format_duration(Some(65.0)), "1ч 5мин");
        assert_eq!(format_duration(Some(120.0)), "2ч 0мин");
        assert_eq!(format_duration(Some(61.7)), "1ч 1мин");
    }

    #[test]
    fn test_fraction_below_one_minute() {
        // Non-zero input takes the floored branch, without the space
        assert_eq!(format_duration(Some(0.4)), "0мин");
    }

    #[test]
    fn test_negative_duration() {
        assert_eq!(format_duration(Some(-5.5)), "-6мин");
    }

    #[test]
    fn test_people_label() {
        assert_eq!(people_label(0), "человек");
        assert_eq!(people_label(1), "человек");
        assert_eq!(people_label(2), "человека");
        assert_eq!(people_label(4), "человека");
        assert_eq!(people_label(5), "человек");
        assert_eq!(people_label(22), "человек");
    }

    #[test]
    fn test_format_clock() {
        let time = NaiveTime::from_hms_opt(9, 5, 3).unwrap();
        assert_eq!(format_clock(time), "09:05:03");
    }
}
