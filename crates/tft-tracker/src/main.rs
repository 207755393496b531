//! `tft-tracker` — record TFT results for a roster of players.
//!
//! Reads `tft-tracker.toml` (or the path given with `--config`), a `.env`
//! file and the environment, opens the SQLite store (migrating it if
//! needed), then runs the requested command.
//!
//! # Usage
//!
//! ```text
//! tft-tracker                        # resolve, ingest and report
//! tft-tracker run --match-count 50
//! tft-tracker view --table rank-history
//! tft-tracker reset --table matches --truncate
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tft_riot::{RiotClient, RiotConfig};
use tft_store_sqlite::{ResetMode, SqliteStore, Table};
use tft_tracker::{
  pipeline::{Progress, RunOptions, run_with_progress},
  report::ReportOptions,
  settings::{Overrides, Settings},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Teamfight Tactics match tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tft-tracker.toml")]
  config: PathBuf,

  /// SQLite database file (overrides `db_path`).
  #[arg(long, global = true)]
  db_path: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Resolve players, ingest new matches and print the report (default).
  Run {
    /// Maximum match IDs requested per player (overrides `match_count`).
    #[arg(long)]
    match_count: Option<u32>,

    /// Do not append rank snapshots to `rank_history`.
    #[arg(long)]
    no_rank_history: bool,
  },
  /// Print every row of a table.
  View {
    #[arg(long, value_enum, default_value_t = TableArg::Matches)]
    table: TableArg,
  },
  /// Drop a table, or empty it with `--truncate`.
  Reset {
    #[arg(long, value_enum, default_value_t = TableArg::Matches)]
    table: TableArg,

    /// Delete all rows and reset the id counter instead of dropping.
    #[arg(long)]
    truncate: bool,
  },
  /// Migrate the database to the current schema and print its version.
  Migrate,
}

#[derive(Clone, Copy, ValueEnum)]
enum TableArg {
  Matches,
  RankHistory,
}

impl From<TableArg> for Table {
  fn from(t: TableArg) -> Self {
    match t {
      TableArg::Matches => Table::Matches,
      TableArg::RankHistory => Table::RankHistory,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // A missing .env is fine; a malformed one is not.
  match dotenvy::dotenv() {
    Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
    Err(e) if e.not_found() => {}
    Err(e) => return Err(e).context("failed to read .env"),
  }

  let command = cli.command.unwrap_or(Command::Run {
    match_count:     None,
    no_rank_history: false,
  });

  let match_count = match &command {
    Command::Run { match_count, .. } => *match_count,
    _ => None,
  };
  let settings = Settings::load(
    &cli.config,
    &Overrides {
      db_path: cli.db_path,
      match_count,
    },
  )
  .context("failed to load configuration")?;

  let store = SqliteStore::open(&settings.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.db_path))?;

  // Close the store on every path, keeping the command's error if both fail.
  let result = execute(command, &settings, &store).await;
  let closed = store.close().await.context("failed to close store");
  result.and(closed)
}

async fn execute(command: Command, settings: &Settings, store: &SqliteStore) -> anyhow::Result<()> {
  match command {
    Command::Run {
      no_rank_history, ..
    } => track(settings, store, !no_rank_history).await,
    Command::View { table } => {
      let dump = store.dump(table.into()).await.context("failed to read table")?;
      println!("{}", dump.columns.join("\t"));
      for row in dump.rows {
        println!("{}", row.join("\t"));
      }
      Ok(())
    }
    Command::Reset { table, truncate } => {
      let mode = if truncate {
        ResetMode::Truncate
      } else {
        ResetMode::Drop
      };
      let table = Table::from(table);
      store.reset(table, mode).await.context("failed to reset table")?;
      match mode {
        ResetMode::Drop => println!("TABLE [{}] has been dropped.", table.name()),
        ResetMode::Truncate => println!("TABLE [{}] has been emptied.", table.name()),
      }
      Ok(())
    }
    Command::Migrate => {
      let version = store.schema_version().await.context("failed to read schema version")?;
      println!("schema version {version}");
      Ok(())
    }
  }
}

async fn track(settings: &Settings, store: &SqliteStore, record_history: bool) -> anyhow::Result<()> {
  let roster = settings.roster().context("invalid player roster")?;
  let api_key = settings.api_key().context("no API key configured")?;

  let client = RiotClient::new(RiotConfig::for_routing(
    api_key,
    &settings.region,
    &settings.continent,
  ))?;

  let summary = run_with_progress(
    &client,
    store,
    &roster,
    RunOptions {
      match_count: settings.match_count,
      report:      ReportOptions { record_history },
    },
    |progress| match progress {
      Progress::Unresolved(failure) => println!("{failure}"),
      Progress::Ingested(ingest) => println!("{ingest}"),
    },
  )
  .await?;

  println!("\nAverage placement per player with current rank:");
  for line in &summary.report {
    println!("{line}");
  }

  tracing::info!(new_matches = summary.new_matches(), "run complete");
  Ok(())
}
