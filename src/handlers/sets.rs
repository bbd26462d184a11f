use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::models::{NewSet, Set};
use crate::repositories::{ExerciseRepository, SetRepository};

#[derive(Clone)]
pub struct SetsState {
    pub set_repo: SetRepository,
    pub exercise_repo: ExerciseRepository,
}

fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::Validation(format!(
            "Weight must be a non-negative number, got {}",
            weight
        )));
    }
    Ok(())
}

async fn ensure_exercise(state: &SetsState, exercise_id: i64) -> Result<()> {
    state
        .exercise_repo
        .find_by_id(exercise_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::Validation(format!("Unknown exercise {}", exercise_id)))
}

pub async fn create(
    State(state): State<SetsState>,
    Json(payload): Json<NewSet>,
) -> Result<(StatusCode, Json<Set>)> {
    validate_weight(payload.weight)?;
    ensure_exercise(&state, payload.exercise_id).await?;

    let set = state.set_repo.create(payload).await?;
    tracing::info!(
        "Created set {} for exercise {}",
        set.set_id,
        set.exercise_id
    );

    Ok((StatusCode::CREATED, Json(set)))
}

pub async fn list_by_exercise(
    State(state): State<SetsState>,
    Path(exercise_id): Path<i64>,
) -> Result<Json<Vec<Set>>> {
    state
        .exercise_repo
        .find_by_id(exercise_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

    let sets = state.set_repo.find_by_exercise(exercise_id).await?;
    Ok(Json(sets))
}

pub async fn update(
    State(state): State<SetsState>,
    Path(id): Path<i64>,
    Json(set): Json<Set>,
) -> Result<Json<Set>> {
    if set.set_id != id {
        return Err(AppError::BadRequest(format!(
            "Set id {} in body does not match path id {}",
            set.set_id, id
        )));
    }
    state
        .set_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Set not found".to_string()))?;
    validate_weight(set.weight)?;
    ensure_exercise(&state, set.exercise_id).await?;

    if !state.set_repo.update(set.clone()).await? {
        return Err(AppError::NotFound("Set not found".to_string()));
    }
    tracing::info!("Updated set {}", id);

    Ok(Json(set))
}

pub async fn delete(State(state): State<SetsState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    if !state.set_repo.delete(id).await? {
        return Err(AppError::NotFound("Set not found".to_string()));
    }
    tracing::info!("Deleted set {}", id);

    Ok(Json(json!({ "deleted": id })))
}
