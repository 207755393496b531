//! Rows of the `matches` and `rank_history` tables.

use chrono::{DateTime, Utc};

use crate::{
  Result,
  account::Account,
  dto::{LeagueEntryDto, MatchDto, ParticipantDto},
  list::IdList,
  time::MatchTiming,
};

/// One tracked player's result in one match. Created once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
  /// `"{game name}#{tag line}"` of the tracked account.
  pub player:    String,
  pub puuid:     String,
  pub match_id:  String,
  pub placement: i64,
  pub augments:  IdList,
  /// Active traits only.
  pub traits:    IdList,
  pub timing:    MatchTiming,
}

impl MatchRecord {
  /// Normalise `participant`'s entry in `detail` into a row for `account`.
  pub fn from_participant(
    account: &Account,
    match_id: &str,
    detail: &MatchDto,
    participant: &ParticipantDto,
  ) -> Result<Self> {
    let timing =
      MatchTiming::from_upstream(detail.info.game_datetime, detail.info.game_length)?;
    Ok(Self {
      player: account.key(),
      puuid: account.puuid.clone(),
      match_id: match_id.to_owned(),
      placement: participant.placement,
      augments: IdList::new(participant.augments.iter().cloned())?,
      traits: IdList::new(participant.active_traits())?,
      timing,
    })
  }
}

/// Result of inserting a [`MatchRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  Inserted,
  /// A row with the same `match_id` already exists; nothing was written.
  Duplicate,
}

/// A `matches` row as read back. `timing` is `None` for rows migrated from
/// the legacy schema, which had no timing columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatch {
  pub id:        i64,
  pub player:    String,
  pub puuid:     String,
  pub match_id:  String,
  pub placement: i64,
  pub augments:  IdList,
  pub traits:    IdList,
  pub timing:    Option<MatchTiming>,
}

/// Mean placement of one player over every stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSummary {
  pub player:         String,
  pub games:          u64,
  pub mean_placement: f64,
}

/// A point-in-time capture of an account's ranked standing.
#[derive(Debug, Clone, PartialEq)]
pub struct RankSnapshot {
  pub summoner_id:   String,
  pub summoner_name: String,
  pub rank_tier:     String,
  pub league_points: i64,
  pub captured_at:   DateTime<Utc>,
}

impl RankSnapshot {
  /// Build a snapshot from a ranked league entry. Returns `None` if the entry
  /// carries no tier.
  pub fn from_entry(
    account: &Account,
    entry: &LeagueEntryDto,
    captured_at: DateTime<Utc>,
  ) -> Option<Self> {
    Some(Self {
      summoner_id: entry
        .summoner_id
        .clone()
        .unwrap_or_else(|| account.puuid.clone()),
      summoner_name: account.key(),
      rank_tier: entry.rank_label()?,
      league_points: entry.league_points.unwrap_or(0),
      captured_at,
    })
  }
}

/// A `rank_history` row as read back.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRank {
  pub id:       i64,
  pub snapshot: RankSnapshot,
}
