use rusqlite::Row;

/// Builds a model from a row selected with the column names the model's
/// table uses.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
