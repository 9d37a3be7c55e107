//! Date parsing and display for content timestamps.
//!
//! Content files carry ISO-ish strings: `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`
//! or full RFC 3339. Anything else is treated as "no date".

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse a content timestamp as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Long Chinese date, e.g. `2024年1月15日`.
pub fn format_date(s: &str) -> Option<String> {
    let date = parse_date(s)?;
    Some(format!("{}年{}月{}日", date.year(), date.month(), date.day()))
}

/// RFC 2822 form used by RSS `pubDate`.
pub fn to_rfc2822(s: &str) -> Option<String> {
    parse_date(s).map(|date| date.to_rfc2822())
}

/// Coarse distance from `now`, e.g. `3 天前`, `2 周前`, `5 个月前`.
///
/// Days are rounded up, weeks/months/years down; months are 30 days and
/// years 365.
pub fn relative_time(s: &str, now: DateTime<Utc>) -> Option<String> {
    let date = parse_date(s)?;
    let millis = (now - date).num_milliseconds().abs();
    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;

    let text = match days {
        0..7 => format!("{days} 天前"),
        7..30 => format!("{} 周前", days / 7),
        30..365 => format!("{} 个月前", days / 30),
        _ => format!("{} 年前", days / 365),
    };
    Some(text)
}

/// Whether `s` falls in the same calendar year as `now`.
pub fn is_this_year(s: &str, now: DateTime<Utc>) -> bool {
    parse_date(s).is_some_and(|date| date.year() == now.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(expected));

        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap();
        assert_eq!(parse_date("2024-01-15T10:30:45Z"), Some(expected));
        assert_eq!(parse_date("2024-01-15T10:30:45"), Some(expected));
        assert_eq!(parse_date("2024-01-15 10:30:45"), Some(expected));
        assert_eq!(parse_date("2024-01-15T18:30:45+08:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2023-02-29"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05").as_deref(), Some("2024年1月5日"));
        assert_eq!(
            format_date("2023-12-31T23:00:00Z").as_deref(),
            Some("2023年12月31日")
        );
        assert_eq!(format_date("not a date"), None);
    }

    #[test]
    fn test_to_rfc2822() {
        let rfc = to_rfc2822("2024-01-15").unwrap();
        assert!(rfc.starts_with("Mon, 15 Jan 2024 00:00:00"));
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = now();
        let cases = [
            ("2024-06-15T12:00:00Z", "0 天前"),
            ("2024-06-14T12:00:00Z", "1 天前"),
            ("2024-06-14", "2 天前"),
            ("2024-06-10T12:00:00Z", "5 天前"),
            ("2024-06-08T12:00:00Z", "1 周前"),
            ("2024-05-20T12:00:00Z", "3 周前"),
            ("2024-05-01T12:00:00Z", "1 个月前"),
            ("2023-12-15T12:00:00Z", "6 个月前"),
            ("2023-07-15T12:00:00Z", "11 个月前"),
            ("2022-06-15T12:00:00Z", "2 年前"),
        ];
        for (date, expected) in cases {
            assert_eq!(
                relative_time(date, now).as_deref(),
                Some(expected),
                "for {date}"
            );
        }
    }

    #[test]
    fn test_relative_time_future_dates_use_distance() {
        assert_eq!(
            relative_time("2024-06-18T12:00:00Z", now()).as_deref(),
            Some("3 天前")
        );
    }

    #[test]
    fn test_is_this_year() {
        assert!(is_this_year("2024-01-01", now()));
        assert!(!is_this_year("2023-12-31", now()));
        assert!(!is_this_year("garbage", now()));
    }
}
