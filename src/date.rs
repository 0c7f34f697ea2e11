use chrono::{DateTime, Datelike, NaiveTime, SecondsFormat, Timelike, Utc};
use std::ops::RangeInclusive;

/// Years that survive a `format_date` / `parse_date` round trip.
pub const YEARS: RangeInclusive<i32> = 0..=9999;

/// Parses a frontmatter date. Inputs without a time of day land on
/// midnight UTC so the same string always yields the same instant.
///
/// The input must spell out a year. `dateparser` fills a missing calendar
/// date from the clock, so `10:30` or `Jan 5` are rejected.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if !has_year(input) {
        return None;
    }
    let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
    dateparser::parse_with(input, &Utc, midnight).ok()
}

/// True when `input` holds a run of at least four digits.
fn has_year(input: &str) -> bool {
    input
        .split(|c: char| !c.is_ascii_digit())
        .any(|run| run.len() >= 4)
}

pub fn is_representable(date: &DateTime<Utc>) -> bool {
    YEARS.contains(&date.year())
}

/// Renders a date the way it is written back into frontmatter:
/// `2024-01-01` for midnight, RFC 3339 otherwise. Only dates within
/// [`YEARS`] parse back.
pub fn format_date(date: &DateTime<Utc>) -> String {
    if date.hour() == 0 && date.minute() == 0 && date.second() == 0 && date.nanosecond() == 0 {
        format!(
            "{:04}-{:0width$}-{:0width$}",
            date.year(),
            date.month(),
            date.day(),
            width = 2
        )
    } else {
        date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_only_is_midnight_utc() {
        let parsed = parse_date("2024-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(format_date(&parsed), "2024-01-01");
    }

    #[test]
    fn timestamps_keep_their_time() {
        let parsed = parse_date("2024-03-05T10:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap());
        assert_eq!(format_date(&parsed), "2024-03-05T10:30:00Z");
        assert_eq!(parse_date(&format_date(&parsed)), Some(parsed));
    }

    #[test]
    fn garbage_is_not_a_date() {
        assert_eq!(parse_date("yesterday-ish"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn time_without_calendar_date_is_rejected() {
        for input in ["10:30", "4:00pm", "07:32:00", "10:30:00.5", "Jan 5"] {
            assert_eq!(parse_date(input), None, "{input}");
        }
    }

    #[test]
    fn years_outside_four_digits_are_not_representable() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_representable(&far));
        assert_eq!(parse_date(&format_date(&far)), None);

        let early = Utc.with_ymd_and_hms(999, 1, 1, 0, 0, 0).unwrap();
        assert!(is_representable(&early));
        assert_eq!(format_date(&early), "0999-01-01");
        assert_eq!(parse_date(&format_date(&early)), Some(early));
    }
}
