use std::collections::BTreeMap;

use chrono::{Datelike, NaiveTime, Timelike};
use tracing::instrument;

use super::entities::{StartEnd, UserSchedule, WeekdayBucket, WeekdayIndex, WEEKDAYS};

const SECONDS_IN_HOUR: i64 = 3600;
const SECONDS_IN_MINUTE: i64 = 60;

pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    time.hour() as i64 * SECONDS_IN_HOUR
        + time.minute() as i64 * SECONDS_IN_MINUTE
        + time.second() as i64
}

/// Converts seconds since midnight back into a time of day. Totals that don't fit into a single
/// day (negative or 86400 and above) have no time representation and return [None].
pub fn time_from_seconds(seconds: i64) -> Option<NaiveTime> {
    let hour = seconds.div_euclid(SECONDS_IN_HOUR);
    let rest = seconds.rem_euclid(SECONDS_IN_HOUR);
    let minute = rest / SECONDS_IN_MINUTE;
    let second = rest % SECONDS_IN_MINUTE;
    NaiveTime::from_hms_opt(
        u32::try_from(hour).ok()?,
        minute as u32,
        second as u32,
    )
}

/// Signed amount of seconds between 2 times of the same day. Negative when `end` comes before
/// `start`.
pub fn interval(start: NaiveTime, end: NaiveTime) -> i64 {
    seconds_since_midnight(end) - seconds_since_midnight(start)
}

/// Arithmetic mean. Returns zero for empty slices.
pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

/// Groups presence intervals by weekday. Every weekday is present in the result, even the ones
/// without any records.
#[instrument(level = "trace", skip_all, fields(days = schedule.len()))]
pub fn group_by_weekday(schedule: &UserSchedule) -> WeekdayBucket<i64> {
    let mut result: WeekdayBucket<i64> = WEEKDAYS.map(|day| (day, vec![])).collect();
    for (date, record) in schedule {
        result
            .entry(date.weekday().num_days_from_monday())
            .or_default()
            .push(interval(record.start, record.end));
    }
    result
}

/// Mean start and end time per weekday. Unlike [group_by_weekday] only weekdays that have at
/// least one record show up in the result.
#[instrument(level = "trace", skip_all, fields(days = schedule.len()))]
pub fn get_weekday_start_end(schedule: &UserSchedule) -> BTreeMap<WeekdayIndex, StartEnd> {
    let mut starts = WeekdayBucket::<i64>::new();
    let mut ends = WeekdayBucket::<i64>::new();
    for (date, record) in schedule {
        let weekday = date.weekday().num_days_from_monday();
        starts
            .entry(weekday)
            .or_default()
            .push(seconds_since_midnight(record.start));
        ends.entry(weekday)
            .or_default()
            .push(seconds_since_midnight(record.end));
    }

    starts
        .into_iter()
        .map(|(weekday, starts)| {
            let ends = ends.get(&weekday).map(Vec::as_slice).unwrap_or_default();
            // `as` truncates towards zero
            let start_end = StartEnd {
                start: mean(&starts) as i64,
                end: mean(ends) as i64,
            };
            (weekday, start_end)
        })
        .collect()
}
