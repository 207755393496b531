//! Incremental match ingestion for one resolved account.
//!
//! Only matches starting at or after the newest stored start are requested.
//! Each is normalised into a [`MatchRecord`] and inserted on its own, so rows
//! written before an upstream failure stay committed, and re-running after
//! any failure is idempotent thanks to the `match_id` uniqueness constraint.

use std::fmt;

use tft_core::{
  account::Account,
  api::{MatchListQuery, StatsApi, UpstreamError},
  record::{InsertOutcome, MatchRecord},
  store::MatchStore,
  time::lower_bound_secs,
};

use crate::{Error, Result};

/// Why a listed match produced no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  /// The account is not among the match's participants. The match list is
  /// scoped to the account, so this indicates inconsistent upstream data.
  MissingParticipant,
  /// The participant's data could not be stored unambiguously.
  InvalidRecord(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMatch {
  pub match_id: String,
  pub reason:   SkipReason,
}

/// An upstream failure that ended an account's ingestion early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aborted {
  pub status:  Option<u16>,
  pub message: String,
}

/// What ingesting one account did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIngest {
  pub player:      String,
  /// Lower bound sent with the match-list request.
  pub start_time:  Option<i64>,
  pub listed:      usize,
  pub new_matches: usize,
  pub duplicates:  usize,
  pub skipped:     Vec<SkippedMatch>,
  pub aborted:     Option<Aborted>,
}

impl AccountIngest {
  fn new(player: String, start_time: Option<i64>) -> Self {
    Self {
      player,
      start_time,
      listed: 0,
      new_matches: 0,
      duplicates: 0,
      skipped: Vec::new(),
      aborted: None,
    }
  }

  /// Matches skipped because the account was missing from the participants.
  pub fn integrity_violations(&self) -> usize {
    self
      .skipped
      .iter()
      .filter(|s| s.reason == SkipReason::MissingParticipant)
      .count()
  }
}

impl fmt::Display for AccountIngest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.aborted {
      None => write!(
        f,
        "Player [{}] had {} new matches stored on this run.",
        self.player, self.new_matches
      ),
      Some(aborted) => write!(
        f,
        "Error fetching data for {}: {} ({} new matches stored before the error)",
        self.player, aborted.message, self.new_matches
      ),
    }
  }
}

enum Interrupt<E> {
  Upstream(E),
  Store(Error),
}

/// Ingest every match `account` played since its newest stored one, up to
/// `match_count` matches.
///
/// Upstream failures end this account's ingestion and are reported in
/// [`AccountIngest::aborted`]. Store failures are returned as errors.
pub async fn ingest_account<A, S>(
  api: &A,
  store: &S,
  account: &Account,
  match_count: u32,
) -> Result<AccountIngest>
where
  A: StatsApi,
  S: MatchStore,
{
  let latest = store
    .latest_start(&account.puuid)
    .await
    .map_err(Error::store)?;
  let query = MatchListQuery {
    start_time: latest.map(lower_bound_secs),
    count:      match_count,
  };

  let mut outcome = AccountIngest::new(account.key(), query.start_time);
  match ingest_listed(api, store, account, query, &mut outcome).await {
    Ok(()) => {}
    Err(Interrupt::Store(e)) => return Err(e),
    Err(Interrupt::Upstream(e)) => {
      tracing::error!(player = %outcome.player, error = %e, "match fetch failed");
      outcome.aborted = Some(Aborted {
        status:  e.status(),
        message: e.to_string(),
      });
    }
  }

  tracing::info!(
    player = %outcome.player,
    display_name = %account.display_name,
    listed = outcome.listed,
    new = outcome.new_matches,
    duplicates = outcome.duplicates,
    skipped = outcome.skipped.len(),
    "ingested account"
  );
  Ok(outcome)
}

async fn ingest_listed<A, S>(
  api: &A,
  store: &S,
  account: &Account,
  query: MatchListQuery,
  outcome: &mut AccountIngest,
) -> Result<(), Interrupt<A::Error>>
where
  A: StatsApi,
  S: MatchStore,
{
  let match_ids = api
    .match_ids(&account.puuid, query)
    .await
    .map_err(Interrupt::Upstream)?;
  outcome.listed = match_ids.len();
  tracing::debug!(player = %outcome.player, ?query, listed = outcome.listed, "listed matches");

  for match_id in match_ids {
    let detail = api
      .match_detail(&match_id)
      .await
      .map_err(Interrupt::Upstream)?;

    let Some(participant) = detail.participant(&account.puuid) else {
      tracing::error!(
        player = %outcome.player,
        %match_id,
        "tracked account missing from match participants"
      );
      outcome.skipped.push(SkippedMatch {
        match_id,
        reason: SkipReason::MissingParticipant,
      });
      continue;
    };

    let record = match MatchRecord::from_participant(account, &match_id, &detail, participant) {
      Ok(record) => record,
      Err(e) => {
        tracing::warn!(player = %outcome.player, %match_id, error = %e, "skipping match");
        outcome.skipped.push(SkippedMatch {
          match_id,
          reason: SkipReason::InvalidRecord(e.to_string()),
        });
        continue;
      }
    };

    match store
      .insert_match(&record)
      .await
      .map_err(|e| Interrupt::Store(Error::store(e)))?
    {
      InsertOutcome::Inserted => outcome.new_matches += 1,
      InsertOutcome::Duplicate => outcome.duplicates += 1,
    }
  }

  Ok(())
}
