//! Error type for `tft-riot`.

use tft_core::api::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid base url {0:?}")]
  InvalidBaseUrl(String),

  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  /// The service answered with a non-success status.
  #[error("GET {url} → {status}")]
  Status {
    url:    String,
    status: u16,
    body:   String,
  },

  #[error("GET {url} failed: {source}")]
  Transport {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("deserialising response of {url}: {source}")]
  Decode {
    url:    String,
    #[source]
    source: reqwest::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl UpstreamError for Error {
  fn status(&self) -> Option<u16> {
    match self {
      Error::Status { status, .. } => Some(*status),
      Error::Transport { source, .. } | Error::Decode { source, .. } => {
        source.status().map(|s| s.as_u16())
      }
      Error::InvalidBaseUrl(_) | Error::Build(_) => None,
    }
  }

  fn url(&self) -> Option<&str> {
    match self {
      Error::Status { url, .. } | Error::Transport { url, .. } | Error::Decode { url, .. } => {
        Some(url)
      }
      Error::InvalidBaseUrl(_) | Error::Build(_) => None,
    }
  }

  fn body(&self) -> Option<&str> {
    match self {
      Error::Status { body, .. } => Some(body),
      _ => None,
    }
  }
}
