//! Async HTTP client for the Riot Games APIs.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tft_core::{
  account::RiotId,
  api::{MatchListQuery, StatsApi},
  dto::{AccountDto, LeagueEntryDto, MatchDto},
};

use crate::{Error, Result};

const TOKEN_HEADER: &str = "X-Riot-Token";

/// Connection settings for the Riot APIs.
#[derive(Debug, Clone)]
pub struct RiotConfig {
  pub api_key:           String,
  /// Base URL of the platform host (league lookups), e.g.
  /// `https://na1.api.riotgames.com`.
  pub platform_base_url: String,
  /// Base URL of the regional host (accounts and matches), e.g.
  /// `https://americas.api.riotgames.com`.
  pub regional_base_url: String,
  pub timeout:           Duration,
}

impl RiotConfig {
  /// Settings for the public endpoints of `region` (platform routing value,
  /// e.g. `na1`) and `continent` (regional routing value, e.g. `americas`).
  pub fn for_routing(
    api_key: impl Into<String>,
    region: &str,
    continent: &str,
  ) -> Self {
    Self {
      api_key:           api_key.into(),
      platform_base_url: format!("https://{region}.api.riotgames.com"),
      regional_base_url: format!("https://{continent}.api.riotgames.com"),
      timeout:           Duration::from_secs(30),
    }
  }
}

/// Async HTTP client for the Riot APIs.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based. Every
/// method issues exactly one request; nothing is retried.
#[derive(Clone)]
pub struct RiotClient {
  client:   Client,
  api_key:  String,
  platform: Url,
  regional: Url,
}

impl RiotClient {
  pub fn new(config: RiotConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Build)?;
    Ok(Self {
      client,
      api_key: config.api_key,
      platform: parse_base(&config.platform_base_url)?,
      regional: parse_base(&config.regional_base_url)?,
    })
  }

  /// `base` with `segments` appended, each percent-encoded.
  fn url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // `parse_base` rejects URLs that cannot carry a path.
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
    let url_str = url.to_string();
    tracing::debug!(url = %url_str, "GET");

    let resp = self
      .client
      .get(url)
      .header(TOKEN_HEADER, &self.api_key)
      .send()
      .await
      .map_err(|source| Error::Transport {
        url: url_str.clone(),
        source,
      })?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status {
        url: url_str,
        status: status.as_u16(),
        body,
      });
    }

    resp
      .json()
      .await
      .map_err(|source| Error::Decode { url: url_str, source })
  }
}

fn parse_base(raw: &str) -> Result<Url> {
  let url = Url::parse(raw).map_err(|_| Error::InvalidBaseUrl(raw.to_owned()))?;
  if url.cannot_be_a_base() {
    return Err(Error::InvalidBaseUrl(raw.to_owned()));
  }
  Ok(url)
}

// ─── StatsApi impl ───────────────────────────────────────────────────────────

impl StatsApi for RiotClient {
  type Error = Error;

  /// `GET /riot/account/v1/accounts/by-riot-id/{gameName}/{tagLine}`
  async fn account_by_riot_id(&self, id: &RiotId) -> Result<AccountDto> {
    let url = Self::url(
      &self.regional,
      &[
        "riot",
        "account",
        "v1",
        "accounts",
        "by-riot-id",
        id.game_name.as_str(),
        id.tag_line.as_str(),
      ],
    );
    self.get_json(url).await
  }

  /// `GET /tft/match/v1/matches/by-puuid/{puuid}/ids?count=..[&startTime=..]`
  async fn match_ids(&self, puuid: &str, query: MatchListQuery) -> Result<Vec<String>> {
    let mut url = Self::url(
      &self.regional,
      &["tft", "match", "v1", "matches", "by-puuid", puuid, "ids"],
    );
    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("count", &query.count.to_string());
      if let Some(start) = query.start_time {
        pairs.append_pair("startTime", &start.to_string());
      }
    }
    self.get_json(url).await
  }

  /// `GET /tft/match/v1/matches/{matchId}`
  async fn match_detail(&self, match_id: &str) -> Result<MatchDto> {
    let url = Self::url(&self.regional, &["tft", "match", "v1", "matches", match_id]);
    self.get_json(url).await
  }

  /// `GET /tft/league/v1/by-puuid/{puuid}`
  async fn league_entries(&self, puuid: &str) -> Result<Vec<LeagueEntryDto>> {
    let url = Self::url(&self.platform, &["tft", "league", "v1", "by-puuid", puuid]);
    self.get_json(url).await
  }
}
