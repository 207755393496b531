//! Error type for `tft-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tft_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The file was written by a newer version of the tracker.
  #[error("unsupported schema version {0}")]
  UnsupportedSchemaVersion(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
