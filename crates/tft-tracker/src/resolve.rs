//! Identity resolution: configured Riot IDs to stable account identifiers.

use std::fmt;

use tft_core::{
  account::{Account, RiotId},
  api::{StatsApi, UpstreamError},
};

/// A Riot ID that could not be resolved this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
  pub riot_id: RiotId,
  pub status:  Option<u16>,
  pub message: String,
}

impl fmt::Display for ResolutionFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.status {
      Some(status) => write!(f, "Failed to fetch {}: {status}", self.riot_id),
      None => write!(f, "Failed to fetch {}: {}", self.riot_id, self.message),
    }
  }
}

/// Accounts resolved this run, in roster order, plus the ones that failed.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
  pub accounts: Vec<Account>,
  pub failures: Vec<ResolutionFailure>,
}

impl Resolution {
  /// The account tracked under `key` (`"Name#TAG"`).
  pub fn get(&self, key: &str) -> Option<&Account> {
    self.accounts.iter().find(|a| a.key() == key)
  }
}

/// Look up every ID in `roster`. A failed lookup skips that player only.
pub async fn resolve_accounts<A: StatsApi>(api: &A, roster: &[RiotId]) -> Resolution {
  let mut resolution = Resolution::default();

  for riot_id in roster {
    match api.account_by_riot_id(riot_id).await {
      Ok(dto) => {
        // The upstream spelling wins over the configured one.
        let display_name = dto.game_name.unwrap_or_else(|| riot_id.game_name.clone());
        tracing::info!(player = %riot_id, %display_name, puuid = %dto.puuid, "resolved account");
        resolution.accounts.push(Account {
          riot_id: riot_id.clone(),
          puuid: dto.puuid,
          display_name,
        });
      }
      Err(e) => {
        tracing::warn!(player = %riot_id, error = %e, "account lookup failed");
        resolution.failures.push(ResolutionFailure {
          riot_id: riot_id.clone(),
          status:  e.status(),
          message: e.to_string(),
        });
      }
    }
  }

  resolution
}
