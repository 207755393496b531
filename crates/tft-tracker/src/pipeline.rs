//! One complete tracker run: resolve, ingest, report.

use tft_core::{account::RiotId, api::StatsApi, store::MatchStore};

use crate::{
  Result,
  ingest::{AccountIngest, ingest_account},
  report::{ReportLine, ReportOptions, build_report},
  resolve::{Resolution, ResolutionFailure, resolve_accounts},
};

/// A stage outcome, handed out as soon as it is known.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
  Unresolved(&'a ResolutionFailure),
  Ingested(&'a AccountIngest),
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
  pub match_count: u32,
  pub report:      ReportOptions,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
  pub resolution: Resolution,
  pub ingests:    Vec<AccountIngest>,
  pub report:     Vec<ReportLine>,
}

impl RunSummary {
  pub fn new_matches(&self) -> usize { self.ingests.iter().map(|i| i.new_matches).sum() }
}

/// Run every stage in order. Only store failures end the run early.
pub async fn run<A, S>(
  api: &A,
  store: &S,
  roster: &[RiotId],
  options: RunOptions,
) -> Result<RunSummary>
where
  A: StatsApi,
  S: MatchStore,
{
  run_with_progress(api, store, roster, options, |_| {}).await
}

/// [`run`], calling `progress` for every failed lookup and after every
/// ingested account. Outcomes reported before a store failure stay reported.
pub async fn run_with_progress<A, S, F>(
  api: &A,
  store: &S,
  roster: &[RiotId],
  options: RunOptions,
  mut progress: F,
) -> Result<RunSummary>
where
  A: StatsApi,
  S: MatchStore,
  F: FnMut(Progress<'_>),
{
  let resolution = resolve_accounts(api, roster).await;
  resolution
    .failures
    .iter()
    .for_each(|failure| progress(Progress::Unresolved(failure)));

  let mut ingests = Vec::with_capacity(resolution.accounts.len());
  for account in &resolution.accounts {
    let ingest = ingest_account(api, store, account, options.match_count).await?;
    progress(Progress::Ingested(&ingest));
    ingests.push(ingest);
  }

  let report = build_report(api, store, &resolution.accounts, options.report).await?;

  Ok(RunSummary {
    resolution,
    ingests,
    report,
  })
}
