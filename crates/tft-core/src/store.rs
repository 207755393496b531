//! The `MatchStore` trait.
//!
//! Implemented by storage backends (e.g. `tft-store-sqlite`). The tracker
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::record::{
  InsertOutcome, MatchRecord, PlacementSummary, RankSnapshot, StoredMatch, StoredRank,
};

/// Persistence for match results and rank snapshots.
///
/// Both tables are append-only: no method updates or deletes a row.
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The newest `start_timestamp` stored for `puuid`, or `None` if the account
  /// has no rows yet.
  fn latest_start<'a>(
    &'a self,
    puuid: &'a str,
  ) -> impl Future<Output = Result<Option<DateTime<Utc>>, Self::Error>> + Send + 'a;

  /// Insert one match row, committed immediately.
  ///
  /// A row whose `match_id` is already stored is left untouched and reported
  /// as [`InsertOutcome::Duplicate`]; that is not an error.
  fn insert_match<'a>(
    &'a self,
    record: &'a MatchRecord,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + 'a;

  /// Mean placement per player over every stored row, ordered by player.
  fn placement_summaries(
    &self,
  ) -> impl Future<Output = Result<Vec<PlacementSummary>, Self::Error>> + Send + '_;

  /// Append a rank snapshot.
  fn record_rank<'a>(
    &'a self,
    snapshot: &'a RankSnapshot,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Rank snapshots recorded under `summoner_name`, oldest first.
  fn rank_history<'a>(
    &'a self,
    summoner_name: &'a str,
  ) -> impl Future<Output = Result<Vec<StoredRank>, Self::Error>> + Send + 'a;

  /// Stored rows for `puuid`, oldest first.
  fn matches_for<'a>(
    &'a self,
    puuid: &'a str,
  ) -> impl Future<Output = Result<Vec<StoredMatch>, Self::Error>> + Send + 'a;

  /// Every stored match ID in insertion order.
  fn match_ids(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn count_matches(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
