use crate::error::{parse_error, CalResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Accepted date formats, tried in order. First match wins, so an ambiguous
/// string such as "03-04-2025" resolves as day-month-year because that format
/// is listed first, not month-day-year.
pub const DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Accepted time formats, tried in order
pub const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%H:%M:%S", "%I:%M:%S %p"];

/// Parse a date string against [`DATE_FORMATS`]
pub fn parse_date(text: &str) -> CalResult<NaiveDate> {
    let trimmed = text.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(parse_error(&format!("Could not parse date: {}", text)))
}

/// Parse a time string against [`TIME_FORMATS`]
pub fn parse_time(text: &str) -> CalResult<NaiveTime> {
    let trimmed = text.trim();
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Ok(time);
        }
    }

    Err(parse_error(&format!("Could not parse time: {}", text)))
}

/// Combine a date string and a time string into a single timestamp
pub fn parse_datetime(date_text: &str, time_text: &str) -> CalResult<NaiveDateTime> {
    let date = parse_date(date_text)?;
    let time = parse_time(time_text)?;
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_every_supported_date_format() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 28).unwrap();
        for text in [
            "28-07-2025",
            "07-28-2025",
            "2025-07-28",
            "28/07/2025",
            "07/28/2025",
            "2025/07/28",
        ] {
            assert_eq!(parse_date(text).unwrap(), expected, "format: {}", text);
        }
    }

    #[test]
    fn parses_every_supported_time_format() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_time("14:30").unwrap(), expected);
        assert_eq!(parse_time("02:30 PM").unwrap(), expected);
        assert_eq!(parse_time("14:30:00").unwrap(), expected);
        assert_eq!(parse_time("02:30:00 PM").unwrap(), expected);
    }

    #[test]
    fn round_trips_each_format_pair() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 28).unwrap();
        let time = NaiveTime::from_hms_opt(9, 15, 0).unwrap();

        for date_format in DATE_FORMATS {
            for time_format in TIME_FORMATS {
                let date_text = date.format(date_format).to_string();
                let time_text = time.format(time_format).to_string();
                let parsed = parse_datetime(&date_text, &time_text).unwrap();
                assert_eq!(parsed.date(), date);
                assert_eq!(parsed.time(), time);
            }
        }
    }

    #[test]
    fn ambiguous_dates_resolve_by_format_order() {
        // Day-month-year is tried before month-day-year
        let parsed = parse_date("03-04-2025").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2025, 4, 3).unwrap());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(parse_date("  2025-07-28  ").is_ok());
        assert!(parse_time(" 10:00 ").is_ok());
    }

    #[test]
    fn unrecognized_date_is_a_parse_error() {
        let err = parse_date("2025.13.40").unwrap_err();
        assert!(matches!(err, Error::Parse(ref message) if message.contains("2025.13.40")));
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        assert!(parse_date("13/13/2025").is_err());
        assert!(parse_datetime("13/13/2025", "10:00").is_err());
    }

    #[test]
    fn unrecognized_time_is_a_parse_error() {
        let err = parse_time("25 o'clock").unwrap_err();
        assert!(matches!(err, Error::Parse(ref message) if message.contains("25 o'clock")));
    }
}
