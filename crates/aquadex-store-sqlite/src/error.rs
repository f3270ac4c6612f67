//! Error type for `aquadex-store-sqlite`.

use aquadex_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] aquadex_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value does not fit its domain type (e.g. a negative count).
  #[error("corrupt column {column}: {value}")]
  Corrupt { column: &'static str, value: i64 },
}

impl StoreError for Error {
  fn domain(&self) -> Option<&aquadex_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
