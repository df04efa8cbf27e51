use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::presence::entities::WeekdayIndex;

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Three letter weekday name, `Mon` for 0 up to `Sun` for 6.
pub fn weekday_abbreviation(weekday: WeekdayIndex) -> Option<String> {
    let weekday = u8::try_from(weekday).ok()?;
    Weekday::try_from(weekday).ok().map(|v| v.to_string())
}

/// This is the standard way of printing a time of day attached to a date.
pub fn format_date_time(date: NaiveDate, time: NaiveTime) -> String {
    NaiveDateTime::new(date, time)
        .format(DATE_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{format_date_time, weekday_abbreviation};

    #[test]
    fn test_weekday_abbreviation() {
        let names = (0..7).filter_map(weekday_abbreviation).collect::<Vec<_>>();
        assert_eq!(names, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(weekday_abbreviation(7), None);
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(
            format_date_time(
                NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
                NaiveTime::from_hms_opt(9, 5, 0).unwrap()
            ),
            "2025-03-16T09:05:00"
        );
    }
}
