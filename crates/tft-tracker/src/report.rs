//! Per-player summary: mean stored placement next to the live rank.

use std::fmt;

use chrono::Utc;
use tft_core::{
  account::Account,
  api::{StatsApi, UpstreamError},
  dto::ranked_entry,
  record::RankSnapshot,
  store::MatchStore,
};

use crate::{Error, Result};

/// A player's current standing in the tracked ranked queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Standing {
  /// `"Gold II"` style label.
  Ranked(String),
  Unranked,
  /// The live lookup failed; the report carries on without a rank.
  LookupFailed {
    url:    String,
    status: Option<u16>,
    body:   String,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
  pub player:         String,
  pub games:          u64,
  pub mean_placement: f64,
  pub standing:       Standing,
}

impl fmt::Display for ReportLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.standing {
      Standing::Ranked(label) => write!(f, "{}: {:.2} {label}", self.player, self.mean_placement),
      Standing::Unranked => write!(f, "{}: {:.2} Unranked", self.player, self.mean_placement),
      Standing::LookupFailed { url, status, body } => {
        writeln!(f, "{url}")?;
        match status {
          Some(status) => write!(f, "Error fetching league data: {status} {body}"),
          None => write!(f, "Error fetching league data: {body}"),
        }
      }
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
  /// Append a `rank_history` row for every ranked lookup.
  pub record_history: bool,
}

impl Default for ReportOptions {
  fn default() -> Self {
    Self {
      record_history: true,
    }
  }
}

/// One line per resolved account that has stored matches, ordered by player.
pub async fn build_report<A, S>(
  api: &A,
  store: &S,
  accounts: &[Account],
  options: ReportOptions,
) -> Result<Vec<ReportLine>>
where
  A: StatsApi,
  S: MatchStore,
{
  let summaries = store.placement_summaries().await.map_err(Error::store)?;
  let mut lines = Vec::with_capacity(summaries.len());

  for summary in summaries {
    let Some(account) = accounts.iter().find(|a| a.key() == summary.player) else {
      continue;
    };

    let standing = match api.league_entries(&account.puuid).await {
      Ok(entries) => {
        let snapshot = ranked_entry(&entries)
          .and_then(|entry| RankSnapshot::from_entry(account, entry, Utc::now()));
        match snapshot {
          Some(snapshot) => {
            if options.record_history {
              store.record_rank(&snapshot).await.map_err(Error::store)?;
            }
            Standing::Ranked(snapshot.rank_tier)
          }
          None => Standing::Unranked,
        }
      }
      Err(e) => {
        tracing::warn!(player = %summary.player, error = %e, "league lookup failed");
        Standing::LookupFailed {
          url:    e.url().unwrap_or_default().to_owned(),
          status: e.status(),
          body:   e.body().map(str::to_owned).unwrap_or_else(|| e.to_string()),
        }
      }
    };

    lines.push(ReportLine {
      player: summary.player,
      games: summary.games,
      mean_placement: summary.mean_placement,
      standing,
    });
  }

  Ok(lines)
}
