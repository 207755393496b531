//! HTTP client for the Riot Games account, TFT match and TFT league APIs.

mod client;

pub mod error;

pub use client::{RiotClient, RiotConfig};
pub use error::{Error, Result};
