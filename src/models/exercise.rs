use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// A named movement that sets are logged against.
///
/// Exercises are read-only from the client side; the backend owns the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(rename = "exerciseID")]
    pub exercise_id: i64,
    #[serde(rename = "exerciseName")]
    pub exercise_name: String,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            exercise_id: row.get("id")?,
            exercise_name: row.get("name")?,
        })
    }
}
