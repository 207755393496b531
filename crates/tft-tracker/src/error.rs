//! Error type for `tft-tracker`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The local store failed. Fatal for the whole run.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("invalid roster entry: {0}")]
  Roster(#[from] tft_core::Error),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("missing setting: {0}")]
  MissingSetting(&'static str),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
