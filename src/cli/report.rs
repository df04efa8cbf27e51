use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    presence::{entities::UserId, source::PresenceSource},
    utils::clock::Clock,
};

use super::{output::responses, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// A single document that can be produced from presence data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    MeanTime {
        user_id: UserId,
    },
    PresenceWeekday {
        user_id: UserId,
    },
    /// Without a date the start and end times are attached to today.
    StartEnd {
        user_id: UserId,
        date: Option<NaiveDate>,
    },
    Users,
}

/// Parses dates like "yesterday" or "15/03/2025" into a calendar date. Relative dates are
/// resolved against `now`.
pub fn parse_report_date(
    value: &str,
    date_style: DateStyle,
    now: DateTime<Local>,
) -> Result<NaiveDate> {
    match parse_date_string(value, now, date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value}: {e}"),
            )
            .into()),
    }
}

/// Loads presence data and shapes it into the requested document. The data is read anew for
/// every report.
#[instrument(skip(source, clock))]
pub async fn build_report(
    report: &Report,
    source: &dyn PresenceSource,
    clock: &dyn Clock,
) -> Result<Value> {
    let table = source.load().await?;
    info!("Loaded presence of {} users", table.len());

    let document = match report {
        Report::MeanTime { user_id } => responses::mean_time_weekday(&table, *user_id),
        Report::PresenceWeekday { user_id } => responses::presence_weekday(&table, *user_id),
        Report::StartEnd { user_id, date } => {
            let date = date.unwrap_or_else(|| clock.time().date_naive());
            responses::presence_start_end(&table, *user_id, date)
        }
        Report::Users => responses::users(&table)?,
    };
    Ok(document)
}
