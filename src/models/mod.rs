pub mod exercise;
pub mod from_row;
pub mod set;

pub use exercise::Exercise;
pub use from_row::FromSqliteRow;
pub use set::{NewSet, Set};
