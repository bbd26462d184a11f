use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Deserializer, Serialize};

use super::FromSqliteRow;

/// Deserialize a set timestamp.
/// Accepts RFC 3339 with any offset, and offset-less ISO timestamps which
/// are taken to be UTC.
fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid set time {s:?}: {e}")))
}

/// One logged performance of an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    #[serde(rename = "setID")]
    pub set_id: i64,
    pub weight: f64,
    pub repetitions: u32,
    #[serde(rename = "exerciseID")]
    pub exercise_id: i64,
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "userID")]
    pub user_id: i64,
}

impl Set {
    pub fn from_new(set_id: i64, new: NewSet) -> Self {
        Self {
            set_id,
            weight: new.weight,
            repetitions: new.repetitions,
            exercise_id: new.exercise_id,
            time: new.time,
            user_id: new.user_id,
        }
    }

    /// Calendar date of `time` in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.time.with_timezone(&Local).date_naive()
    }
}

impl FromSqliteRow for Set {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            set_id: row.get("id")?,
            weight: row.get("weight")?,
            repetitions: row.get("repetitions")?,
            exercise_id: row.get("exercise_id")?,
            time: row.get("time")?,
            user_id: row.get("user_id")?,
        })
    }
}

/// Payload for creating a set. The identifier is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSet {
    pub weight: f64,
    pub repetitions: u32,
    #[serde(rename = "exerciseID")]
    pub exercise_id: i64,
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    #[serde(rename = "userID")]
    pub user_id: i64,
}

impl NewSet {
    pub fn new(
        exercise_id: i64,
        user_id: i64,
        weight: f64,
        repetitions: u32,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            weight,
            repetitions,
            exercise_id,
            time,
            user_id,
        }
    }
}
