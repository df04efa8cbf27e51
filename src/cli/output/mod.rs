pub mod responses;

use std::{fmt::Display, io::Write};

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// Writes a response document. Json is written in a single line, table writes a tab separated
/// line for every row of the document.
pub fn render(document: &Value, format: OutputFormat, mut out: impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, document)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            let rows = match document {
                Value::Array(rows) => rows.as_slice(),
                other => std::slice::from_ref(other),
            };
            for row in rows {
                writeln!(out, "{}", table_row(row))?;
            }
        }
    }
    Ok(())
}

fn table_row(row: &Value) -> String {
    match row {
        Value::Array(cells) => cells.iter().map(table_cell).collect::<Vec<_>>().join("\t"),
        Value::Object(fields) => fields.values().map(table_cell).collect::<Vec<_>>().join("\t"),
        other => table_cell(other),
    }
}

fn table_cell(cell: &Value) -> String {
    match cell {
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    use crate::presence::entities::{DayRecord, PresenceTable, UserSchedule};

    use super::{render, responses::users, OutputFormat};

    fn render_to_string(document: serde_json::Value, format: OutputFormat) -> Result<String> {
        let mut out = vec![];
        render(&document, format, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_render_json() -> Result<()> {
        let document = json!([["Weekday", "Presence (s)"], ["Mon", 24465]]);

        assert_eq!(
            render_to_string(document, OutputFormat::Json)?,
            "[[\"Weekday\",\"Presence (s)\"],[\"Mon\",24465]]\n"
        );
        Ok(())
    }

    #[test]
    fn test_render_table() -> Result<()> {
        let document = json!([
            ["Tue", "2025-03-16T09:19:32", "2025-03-16T16:43:25"],
            {"user_id": 10, "days": 3}
        ]);

        assert_eq!(
            render_to_string(document, OutputFormat::Table)?,
            "Tue\t2025-03-16T09:19:32\t2025-03-16T16:43:25\n10\t3\n"
        );
        Ok(())
    }

    #[test]
    fn test_render_users_table_keeps_field_order() -> Result<()> {
        let record = DayRecord::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        );
        let table = PresenceTable::from([
            (
                11,
                UserSchedule::from([(NaiveDate::from_ymd_opt(2013, 9, 10).unwrap(), record)]),
            ),
            (
                10,
                UserSchedule::from([
                    (NaiveDate::from_ymd_opt(2013, 9, 10).unwrap(), record),
                    (NaiveDate::from_ymd_opt(2013, 9, 11).unwrap(), record),
                ]),
            ),
        ]);

        assert_eq!(
            render_to_string(users(&table)?, OutputFormat::Table)?,
            "10\t2\n11\t1\n"
        );
        assert_eq!(
            render_to_string(users(&table)?, OutputFormat::Json)?,
            "[{\"user_id\":10,\"days\":2},{\"user_id\":11,\"days\":1}]\n"
        );
        Ok(())
    }

    #[test]
    fn test_render_empty_table() -> Result<()> {
        assert_eq!(render_to_string(json!([]), OutputFormat::Table)?, "");
        Ok(())
    }
}
