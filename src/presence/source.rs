use std::{io::ErrorKind, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Timelike};
use fs4::tokio::AsyncFileExt;
use serde::{Deserialize, Deserializer};
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

use super::entities::{DayRecord, PresenceTable, UserId};

const PRESENCE_COLUMNS: usize = 4;

/// Interface for abstracting where presence data comes from. Every call is expected to return
/// freshly read data.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PresenceSource: Send + Sync {
    async fn load(&self) -> Result<PresenceTable>;
}

/// Reads presence from a csv file with `user_id,date,start_time,end_time` rows.
pub struct CsvPresenceSource {
    path: PathBuf,
}

impl CsvPresenceSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_all(&self) -> std::result::Result<Vec<u8>, std::io::Error> {
        debug!("Reading {:?}", self.path);
        let mut file = File::open(&self.path).await?;
        file.lock_shared()?;
        let mut content = vec![];
        let read = file.read_to_end(&mut content).await;
        file.unlock_async().await?;
        read?;
        Ok(content)
    }
}

#[async_trait]
impl PresenceSource for CsvPresenceSource {
    async fn load(&self) -> Result<PresenceTable> {
        match self.read_all().await {
            Ok(content) => Ok(parse_presence_csv(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Presence file {:?} doesn't exist", self.path);
                Ok(PresenceTable::new())
            }
            Err(e) => Err(e)?,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PresenceRow {
    #[serde(deserialize_with = "deserialize_user_id")]
    user_id: UserId,
    #[serde(deserialize_with = "deserialize_date")]
    date: NaiveDate,
    #[serde(deserialize_with = "deserialize_time")]
    start: NaiveTime,
    #[serde(deserialize_with = "deserialize_time")]
    end: NaiveTime,
}

/// Ids may be padded with whitespace.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse().map_err(serde::de::Error::custom)
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let time = NaiveTime::parse_from_str(&s, "%H:%M:%S").map_err(serde::de::Error::custom)?;
    // chrono represents a leap second as a nanosecond overflow
    if time.nanosecond() >= 1_000_000_000 {
        return Err(serde::de::Error::custom(format!("{s} is a leap second")));
    }
    Ok(time)
}

/// Groups csv rows by user. Rows without exactly 4 columns (headers, footers) are skipped, rows
/// with unparsable values are dropped without failing the whole read.
pub fn parse_presence_csv(content: &[u8]) -> PresenceTable {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut table = PresenceTable::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Problem with line {index}: {e}");
                continue;
            }
        };
        if record.len() != PRESENCE_COLUMNS {
            continue;
        }

        match record.deserialize::<PresenceRow>(None) {
            Ok(row) => {
                table
                    .entry(row.user_id)
                    .or_default()
                    .insert(row.date, DayRecord::new(row.start, row.end));
            }
            Err(e) => debug!("Problem with line {index}: {e}"),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::{tempdir, NamedTempFile};

    use crate::{
        presence::entities::DayRecord,
        utils::logging::TEST_LOGGING,
    };

    use super::{parse_presence_csv, CsvPresenceSource, PresenceSource};

    const TEST_CSV: &str = "user_id,date,start,end\n\
                            10,2013-09-10,09:39:05,16:26:50\n\
                            10,2013-09-11,09:19:52,16:07:37\n\
                            11,2013-09-10,09:19:52,16:07:37\n\
                            11,2013-09-10,08:00:00,15:00:00\n\
                            generated at 2013-09-12\n";

    fn time(hour: u32, minute: u32, second: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, second).unwrap()
    }

    #[test]
    fn test_parse_presence_csv() {
        *TEST_LOGGING;
        let table = parse_presence_csv(TEST_CSV.as_bytes());

        let mut users = table.keys().copied().collect::<Vec<_>>();
        users.sort();
        assert_eq!(users, vec![10, 11]);

        let sample_date = NaiveDate::from_ymd_opt(2013, 9, 10).unwrap();
        assert_eq!(table[&10].len(), 2);
        assert_eq!(
            table[&10][&sample_date],
            DayRecord::new(time(9, 39, 5), time(16, 26, 50))
        );
        // Later rows overwrite earlier rows of the same day
        assert_eq!(table[&11].len(), 1);
        assert_eq!(
            table[&11][&sample_date],
            DayRecord::new(time(8, 0, 0), time(15, 0, 0))
        );
    }

    #[test]
    fn test_parse_presence_csv_drops_malformed_rows() {
        *TEST_LOGGING;
        let content = "\n\
                       1,2,3,4,5\n\
                       3a,2012-12-31,0:0:0,0:0:1\n\
                       3,2012-12-51,0:0:0,0:0:1\n\
                       3,2012-12-31,25:00:00,0:0:1\n\
                       3,2013-09-10,12:00:60,13:00:00\n\
                       3,2013-09-10,12:00:00,13:00:60\n";

        assert!(parse_presence_csv(content.as_bytes()).is_empty());
    }

    #[test]
    fn test_parse_presence_csv_single_digit_times() {
        let table = parse_presence_csv("3,2012-12-31,0:0:0,0:0:1\n".as_bytes());

        let date = NaiveDate::from_ymd_opt(2012, 12, 31).unwrap();
        assert_eq!(table[&3][&date], DayRecord::new(time(0, 0, 0), time(0, 0, 1)));
    }

    #[test]
    fn test_parse_presence_csv_trims_user_id() {
        let table = parse_presence_csv(" 4 ,2013-09-10,12:00:00,13:00:00\n".as_bytes());

        let date = NaiveDate::from_ymd_opt(2013, 9, 10).unwrap();
        assert_eq!(table[&4][&date], DayRecord::new(time(12, 0, 0), time(13, 0, 0)));
    }

    #[tokio::test]
    async fn test_csv_source_load() -> Result<()> {
        *TEST_LOGGING;
        let mut file = NamedTempFile::new()?;
        file.write_all(TEST_CSV.as_bytes())?;

        let source = CsvPresenceSource::new(file.path().to_path_buf());
        let table = source.load().await?;

        assert_eq!(table.len(), 2);
        assert_eq!(table[&10].len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_source_missing_file() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;

        let source = CsvPresenceSource::new(dir.path().join("missing.csv"));

        assert!(source.load().await?.is_empty());
        Ok(())
    }
}
