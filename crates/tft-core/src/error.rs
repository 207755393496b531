//! Error types for `tft-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid riot id {0:?}: expected \"GameName#TAG\"")]
  InvalidRiotId(String),

  /// An augment or trait identifier that cannot be stored unambiguously.
  #[error("invalid list item {0:?}: must be a non-empty trimmed identifier without ','")]
  InvalidListItem(String),

  #[error("timestamp out of range: {0} ms")]
  TimestampOutOfRange(i64),

  #[error("invalid match length: {0} s")]
  InvalidLength(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
