//! Shapes aggregated presence into the documents consumed by the chart pages. Weekdays are sent
//! as arrays of rows instead of objects, so that their order survives serialization.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    presence::{
        aggregation::{get_weekday_start_end, group_by_weekday, mean, time_from_seconds},
        entities::{PresenceTable, UserId, UserSchedule},
    },
    utils::time::{format_date_time, weekday_abbreviation},
};

pub const PRESENCE_HEADER: [&str; 2] = ["Weekday", "Presence (s)"];

/// Fields are serialized in declaration order.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub days: usize,
}

fn find_user(table: &PresenceTable, user_id: UserId) -> Option<&UserSchedule> {
    let schedule = table.get(&user_id);
    if schedule.is_none() {
        debug!("User {user_id} not found!");
    }
    schedule
}

/// Mean presence of a user for every weekday: `[["Mon", 30125.5], ...]`.
pub fn mean_time_weekday(table: &PresenceTable, user_id: UserId) -> Value {
    let Some(schedule) = find_user(table, user_id) else {
        return json!([]);
    };

    group_by_weekday(schedule)
        .into_iter()
        .filter_map(|(weekday, intervals)| {
            // weekdays without records are sent as an integer zero
            let value = if intervals.is_empty() {
                json!(0)
            } else {
                json!(mean(&intervals))
            };
            Some(json!([weekday_abbreviation(weekday)?, value]))
        })
        .collect()
}

/// Total presence of a user for every weekday, preceded by a header row.
pub fn presence_weekday(table: &PresenceTable, user_id: UserId) -> Value {
    let Some(schedule) = find_user(table, user_id) else {
        return json!([]);
    };

    let rows = group_by_weekday(schedule)
        .into_iter()
        .filter_map(|(weekday, intervals)| {
            Some(json!([
                weekday_abbreviation(weekday)?,
                intervals.iter().sum::<i64>()
            ]))
        });

    std::iter::once(json!(PRESENCE_HEADER)).chain(rows).collect()
}

/// Mean start and end of a user for every weekday the user was present on. Times are attached to
/// `date`, so that charts can treat them as datetimes.
pub fn presence_start_end(table: &PresenceTable, user_id: UserId, date: NaiveDate) -> Value {
    let Some(schedule) = find_user(table, user_id) else {
        return json!([]);
    };

    get_weekday_start_end(schedule)
        .into_iter()
        .filter_map(|(weekday, start_end)| {
            let (Some(start), Some(end)) = (
                time_from_seconds(start_end.start),
                time_from_seconds(start_end.end),
            ) else {
                warn!("Mean of weekday {weekday} doesn't fit into a day {start_end:?}");
                return None;
            };
            Some(json!([
                weekday_abbreviation(weekday)?,
                format_date_time(date, start),
                format_date_time(date, end)
            ]))
        })
        .collect()
}

/// Every user found in presence data, ordered by id.
pub fn users(table: &PresenceTable) -> Result<Value> {
    let mut users = table
        .iter()
        .map(|(user_id, schedule)| UserSummary {
            user_id: *user_id,
            days: schedule.len(),
        })
        .collect::<Vec<_>>();
    users.sort_by_key(|v| v.user_id);
    Ok(serde_json::to_value(users)?)
}
