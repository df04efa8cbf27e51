use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};

pub type UserId = i64;

/// Weekday number where Monday is 0 and Sunday is 6.
pub type WeekdayIndex = u32;

pub const WEEKDAYS: std::ops::Range<WeekdayIndex> = 0..7;

/// Check-in and check-out of a user for a single day. `end` is not required to come after
/// `start`, intervals computed from such records are simply negative.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct DayRecord {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DayRecord {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// All recorded days of one user.
pub type UserSchedule = HashMap<NaiveDate, DayRecord>;

/// Schedules of every user found in the source.
pub type PresenceTable = HashMap<UserId, UserSchedule>;

/// Values grouped by weekday. Ordered so that iteration goes from Monday to Sunday.
pub type WeekdayBucket<T> = BTreeMap<WeekdayIndex, Vec<T>>;

/// Mean start and end of a weekday, both in seconds since midnight.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct StartEnd {
    pub start: i64,
    pub end: i64,
}
