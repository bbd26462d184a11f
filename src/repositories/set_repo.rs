use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, NewSet, Set};

#[derive(Clone)]
pub struct SetRepository {
    pool: DbPool,
}

impl SetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewSet) -> Result<Set> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO sets (exercise_id, user_id, weight, repetitions, time)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    new.exercise_id,
                    new.user_id,
                    new.weight,
                    new.repetitions,
                    new.time
                ],
            )?;
            Ok(Set::from_new(conn.last_insert_rowid(), new))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Set>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM sets WHERE id = ?")?;
            let result = stmt.query_row([id], Set::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Sets for one exercise, oldest first.
    pub async fn find_by_exercise(&self, exercise_id: i64) -> Result<Vec<Set>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM sets WHERE exercise_id = ? ORDER BY time, id")?;
            let sets = stmt
                .query_map([exercise_id], Set::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sets)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Replace every mutable column. Returns false when no row has `set.set_id`.
    pub async fn update(&self, set: Set) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE sets
                 SET exercise_id = ?, user_id = ?, weight = ?, repetitions = ?, time = ?
                 WHERE id = ?",
                rusqlite::params![
                    set.exercise_id,
                    set.user_id,
                    set.weight,
                    set.repetitions,
                    set.time,
                    set.set_id
                ],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM sets WHERE id = ?", [id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
