use axum::{
    routing::{get, post, put},
    Router,
};

use crate::db::DbPool;
use crate::handlers::{exercises, health, sets};
use crate::repositories::{ExerciseRepository, SetRepository};

pub fn create_router(
    exercises_state: exercises::ExercisesState,
    sets_state: sets::SetsState,
) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        // Exercise routes
        .route("/api/exercises", get(exercises::list))
        .with_state(exercises_state)
        // Set routes
        .route("/api/sets", post(sets::create))
        .route("/api/sets/exercise/{exercise_id}", get(sets::list_by_exercise))
        .route("/api/sets/{id}", put(sets::update).delete(sets::delete))
        .with_state(sets_state)
}

/// Wire repositories over `pool` into the full API router.
pub fn app(pool: DbPool) -> Router {
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let set_repo = SetRepository::new(pool);

    let exercises_state = exercises::ExercisesState {
        exercise_repo: exercise_repo.clone(),
    };
    let sets_state = sets::SetsState {
        set_repo,
        exercise_repo,
    };

    create_router(exercises_state, sets_state)
}
