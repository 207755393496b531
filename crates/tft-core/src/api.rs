//! The `StatsApi` trait: the upstream match-statistics service.

use std::future::Future;

use crate::{
  account::RiotId,
  dto::{AccountDto, LeagueEntryDto, MatchDto},
};

/// Parameters of a match-ID list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchListQuery {
  /// Only matches starting at or after this instant (epoch seconds).
  pub start_time: Option<i64>,
  /// Maximum number of IDs returned.
  pub count:      u32,
}

/// Errors raised by a [`StatsApi`] implementation.
pub trait UpstreamError: std::error::Error + Send + Sync + 'static {
  /// HTTP status of a non-success response; `None` for transport or decode
  /// failures.
  fn status(&self) -> Option<u16>;

  /// The request URL that failed, if a request was made.
  fn url(&self) -> Option<&str>;

  /// Response body of a non-success response, if any was read.
  fn body(&self) -> Option<&str> { None }
}

/// Read-only access to the upstream service. Every call is a single request;
/// implementations do not retry.
pub trait StatsApi: Send + Sync {
  type Error: UpstreamError;

  fn account_by_riot_id<'a>(
    &'a self,
    id: &'a RiotId,
  ) -> impl Future<Output = Result<AccountDto, Self::Error>> + Send + 'a;

  /// Match IDs for `puuid`, newest first.
  fn match_ids<'a>(
    &'a self,
    puuid: &'a str,
    query: MatchListQuery,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  fn match_detail<'a>(
    &'a self,
    match_id: &'a str,
  ) -> impl Future<Output = Result<MatchDto, Self::Error>> + Send + 'a;

  fn league_entries<'a>(
    &'a self,
    puuid: &'a str,
  ) -> impl Future<Output = Result<Vec<LeagueEntryDto>, Self::Error>> + Send + 'a;
}
