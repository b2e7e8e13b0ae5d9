//! Value parsers for command-line arguments.

use chrono::NaiveDate;
use tutortrack_core::{LessonStatus, Weekday};

/// Parse a day name such as `Monday` or `mon`
pub fn parse_weekday(value: &str) -> Result<Weekday, String> {
    value.parse().map_err(|_| {
        format!(
            "'{}' is not a day of the week (expected Monday..Sunday)",
            value
        )
    })
}

/// Parse `DAY` or `DAY=MAX`; a bare day takes one student
pub fn parse_day_capacity(value: &str) -> Result<(Weekday, u32), String> {
    match value.split_once('=') {
        Some((day, max)) => {
            let max = max
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a valid student count", max.trim()))?;
            Ok((parse_weekday(day)?, max))
        }
        None => Ok((parse_weekday(value)?, 1)),
    }
}

pub fn parse_status(value: &str) -> Result<LessonStatus, String> {
    value
        .parse()
        .map_err(|_| format!("'{}' is not a lesson status (completed or missed)", value))
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_capacity() {
        assert_eq!(
            parse_day_capacity("Monday=3").unwrap(),
            (Weekday::Monday, 3)
        );
        assert_eq!(parse_day_capacity("fri").unwrap(), (Weekday::Friday, 1));
        assert_eq!(
            parse_day_capacity("tuesday = 2").unwrap(),
            (Weekday::Tuesday, 2)
        );
        assert!(parse_day_capacity("Someday=2").is_err());
        assert!(parse_day_capacity("Monday=many").is_err());
        assert!(parse_day_capacity("Monday=-1").is_err());
    }

    #[test]
    fn test_parse_status_and_date() {
        assert_eq!(parse_status("completed").unwrap(), LessonStatus::Completed);
        assert_eq!(parse_status("missed").unwrap(), LessonStatus::Missed);
        assert!(parse_status("late").is_err());

        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
