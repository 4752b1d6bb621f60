//! Error type for `revu-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A rating column held a value outside `1..=5`.
  #[error("corrupt rating: {0}")]
  CorruptRating(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
