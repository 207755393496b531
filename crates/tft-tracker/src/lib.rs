//! Tracks Teamfight Tactics results for a fixed roster of players.
//!
//! One run resolves every configured Riot ID, ingests the matches each
//! account played since the newest one already stored, and reports each
//! player's mean placement next to their live rank. Everything is generic
//! over [`StatsApi`](tft_core::api::StatsApi) and
//! [`MatchStore`](tft_core::store::MatchStore); the binary wires in
//! `tft-riot` and `tft-store-sqlite`.

pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod settings;

pub use error::{Error, Result};
