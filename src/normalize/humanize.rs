use chrono::{DateTime, Utc};

const UNITS: [(u64, &str); 3] = [(3600, "hr"), (60, "min"), (1, "sec")];

/// Formats a build duration using its two largest non-zero units.
///
/// `125_000` becomes `"2 min 5 sec"` and `3_725_000` becomes `"1 hr 2 min"`.
/// Sub-second durations render as `"0 sec"`.
pub fn format_duration(ms: u64) -> String {
    let mut remaining = ms / 1000;
    let mut parts = Vec::with_capacity(2);

    for (size, label) in UNITS {
        let amount = remaining / size;
        remaining %= size;
        if amount > 0 && parts.len() < 2 {
            parts.push(format!("{amount} {label}"));
        }
    }

    if parts.is_empty() {
        "0 sec".to_string()
    } else {
        parts.join(" ")
    }
}

/// Describes `timestamp_ms` relative to `now`, e.g. `"3 hours ago"` or
/// `"5 minutes from now"`.
pub fn to_relative_time(timestamp_ms: i64, now: DateTime<Utc>) -> String {
    let delta_ms = now.timestamp_millis().saturating_sub(timestamp_ms);
    let seconds = delta_ms.unsigned_abs() / 1000;

    if seconds == 0 {
        return "now".to_string();
    }

    let phrase = natural_delta(seconds);
    if delta_ms < 0 {
        format!("{phrase} from now")
    } else {
        format!("{phrase} ago")
    }
}

/// Months are 30.5 days and only counted below two years; the second year
/// keeps its remainder ("1 year, 1 month").
fn natural_delta(seconds: u64) -> String {
    let total_days = seconds / 86_400;
    let years = total_days / 365;
    let days = total_days % 365;
    let months = days * 2 / 61;

    if total_days == 0 {
        return match seconds {
            1 => "a second".to_string(),
            s if s < 60 => format!("{s} seconds"),
            s if s < 120 => "a minute".to_string(),
            s if s < 3600 => format!("{} minutes", s / 60),
            s if s < 7200 => "an hour".to_string(),
            s => format!("{} hours", s / 3600),
        };
    }

    match years {
        0 => match (days, months) {
            (1, _) => "a day".to_string(),
            (_, 0) => format!("{days} days"),
            (_, 1) => "a month".to_string(),
            (_, months) => format!("{months} months"),
        },
        1 => match (months, days) {
            (0, 0) => "a year".to_string(),
            (0, 1) => "1 year, 1 day".to_string(),
            (0, days) => format!("1 year, {days} days"),
            (1, _) => "1 year, 1 month".to_string(),
            (months, _) => format!("1 year, {months} months"),
        },
        years => format!("{years} years"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ago(duration: Duration) -> i64 {
        (now() - duration).timestamp_millis()
    }

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration(45_000), "45 sec");
        assert_eq!(format_duration(59_999), "59 sec");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(125_000), "2 min 5 sec");
    }

    #[test]
    fn test_format_duration_keeps_two_largest_units() {
        assert_eq!(format_duration(3_725_000), "1 hr 2 min");
        assert_eq!(format_duration(3_661_000), "1 hr 1 min");
    }

    #[test]
    fn test_format_duration_skips_zero_units() {
        assert_eq!(format_duration(3_600_000), "1 hr");
        assert_eq!(format_duration(3_605_000), "1 hr 5 sec");
        assert_eq!(format_duration(120_000), "2 min");
    }

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(0), "0 sec");
        assert_eq!(format_duration(999), "0 sec");
    }

    #[test]
    fn test_relative_time_past() {
        assert_eq!(to_relative_time(ago(Duration::hours(3)), now()), "3 hours ago");
        assert_eq!(to_relative_time(ago(Duration::seconds(1)), now()), "a second ago");
        assert_eq!(to_relative_time(ago(Duration::seconds(30)), now()), "30 seconds ago");
        assert_eq!(to_relative_time(ago(Duration::seconds(90)), now()), "a minute ago");
        assert_eq!(to_relative_time(ago(Duration::minutes(42)), now()), "42 minutes ago");
        assert_eq!(to_relative_time(ago(Duration::minutes(61)), now()), "an hour ago");
    }

    #[test]
    fn test_relative_time_days_months_years() {
        assert_eq!(to_relative_time(ago(Duration::days(1)), now()), "a day ago");
        assert_eq!(to_relative_time(ago(Duration::days(12)), now()), "12 days ago");
        assert_eq!(to_relative_time(ago(Duration::days(35)), now()), "a month ago");
        assert_eq!(to_relative_time(ago(Duration::days(95)), now()), "3 months ago");
        assert_eq!(to_relative_time(ago(Duration::days(800)), now()), "2 years ago");
    }

    #[test]
    fn test_relative_time_month_boundary_is_thirty_and_a_half_days() {
        assert_eq!(to_relative_time(ago(Duration::days(30)), now()), "30 days ago");
        assert_eq!(
            to_relative_time(ago(Duration::days(30) + Duration::hours(11)), now()),
            "30 days ago"
        );
        assert_eq!(to_relative_time(ago(Duration::days(31)), now()), "a month ago");
        assert_eq!(to_relative_time(ago(Duration::days(364)), now()), "11 months ago");
    }

    #[test]
    fn test_relative_time_second_year_keeps_remainder() {
        assert_eq!(to_relative_time(ago(Duration::days(365)), now()), "a year ago");
        assert_eq!(to_relative_time(ago(Duration::days(366)), now()), "1 year, 1 day ago");
        assert_eq!(to_relative_time(ago(Duration::days(370)), now()), "1 year, 5 days ago");
        assert_eq!(to_relative_time(ago(Duration::days(400)), now()), "1 year, 1 month ago");
        assert_eq!(to_relative_time(ago(Duration::days(500)), now()), "1 year, 4 months ago");
    }

    #[test]
    fn test_relative_time_now_and_future() {
        assert_eq!(to_relative_time(now().timestamp_millis(), now()), "now");
        assert_eq!(
            to_relative_time((now() + Duration::minutes(5)).timestamp_millis(), now()),
            "5 minutes from now"
        );
    }
}
