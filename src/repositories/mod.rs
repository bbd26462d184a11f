pub mod exercise_repo;
pub mod set_repo;

pub use exercise_repo::ExerciseRepository;
pub use set_repo::SetRepository;
