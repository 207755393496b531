//! [`SqliteStore`] — the SQLite implementation of [`MatchStore`].

use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use tft_core::{
  record::{
    InsertOutcome, MatchRecord, PlacementSummary, RankSnapshot, StoredMatch, StoredRank,
  },
  store::MatchStore,
};

use crate::{
  Error, Result,
  encode::{RawMatch, RawRank, decode_dt, encode_dt, render_value},
  schema::{Migration, SCHEMA_VERSION, migrate},
};

// ─── Maintenance types ───────────────────────────────────────────────────────

/// The tables owned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
  Matches,
  RankHistory,
}

impl Table {
  pub fn name(self) -> &'static str {
    match self {
      Table::Matches => "matches",
      Table::RankHistory => "rank_history",
    }
  }
}

/// How [`SqliteStore::reset`] clears a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
  /// Drop the table; it is recreated the next time a store is opened.
  Drop,
  /// Delete every row and reset the AUTOINCREMENT counter.
  Truncate,
}

/// Every row of a table, rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDump {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A match store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. The
/// connection is released when [`SqliteStore::close`] is called or the last
/// clone is dropped.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and migrate it to the current schema.
  ///
  /// Timestamps in an unversioned database are taken to be in the host's
  /// local time zone.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_legacy_zone(path, Local).await
  }

  /// [`SqliteStore::open`], reading unversioned timestamps as wall-clock time
  /// in `zone`.
  pub async fn open_with_legacy_zone<Tz>(path: impl AsRef<Path>, zone: Tz) -> Result<Self>
  where
    Tz: TimeZone + Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(zone).await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(Utc).await?;
    Ok(store)
  }

  /// Close the underlying connection, surfacing any error SQLite reports.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema<Tz>(&self, legacy_zone: Tz) -> Result<Migration>
  where
    Tz: TimeZone + Send + 'static,
  {
    let migration = self
      .conn
      .call(move |conn| Ok(migrate(conn, &legacy_zone)?))
      .await?;
    match migration {
      Migration::Unsupported(version) => {
        return Err(Error::UnsupportedSchemaVersion(version));
      }
      Migration::Current => {}
      Migration::Created => tracing::info!("created schema v{SCHEMA_VERSION}"),
      Migration::Stamped { localized } => tracing::info!(
        localized,
        "stamped existing schema as v{SCHEMA_VERSION}"
      ),
      Migration::UpgradedLegacy {
        copied,
        dropped_duplicates,
        localized,
      } => tracing::info!(
        copied,
        dropped_duplicates,
        localized,
        "migrated legacy matches table to schema v{SCHEMA_VERSION}"
      ),
    }
    Ok(migration)
  }

  /// Current `PRAGMA user_version`.
  pub async fn schema_version(&self) -> Result<i64> {
    let version = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
      .await?;
    Ok(version)
  }

  /// Every row of `table`, in `id` order.
  pub async fn dump(&self, table: Table) -> Result<TableDump> {
    let dump = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("SELECT * FROM {} ORDER BY id", table.name()))?;
        let columns: Vec<String> =
          stmt.column_names().into_iter().map(str::to_owned).collect();
        let width = columns.len();
        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get_ref(i).map(render_value))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(TableDump { columns, rows })
      })
      .await?;
    Ok(dump)
  }

  /// Clear `table` according to `mode`.
  pub async fn reset(&self, table: Table, mode: ResetMode) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let name = table.name();
        match mode {
          ResetMode::Drop => conn.execute_batch(&format!("DROP TABLE IF EXISTS {name};"))?,
          ResetMode::Truncate => {
            let tx = conn.transaction()?;
            tx.execute(&format!("DELETE FROM {name}"), [])?;
            tx.execute("DELETE FROM sqlite_sequence WHERE name = ?1", [name])?;
            tx.commit()?;
          }
        }
        Ok(())
      })
      .await?;
    tracing::info!(table = table.name(), ?mode, "table reset");
    Ok(())
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  async fn latest_start(&self, puuid: &str) -> Result<Option<DateTime<Utc>>> {
    let puuid = puuid.to_owned();
    let latest: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(start_timestamp) FROM matches WHERE puuid = ?1",
          [puuid],
          |r| r.get(0),
        )?)
      })
      .await?;

    latest.as_deref().map(decode_dt).transpose()
  }

  async fn insert_match(&self, record: &MatchRecord) -> Result<InsertOutcome> {
    let player    = record.player.clone();
    let puuid     = record.puuid.clone();
    let match_id  = record.match_id.clone();
    let placement = record.placement;
    let augments  = record.augments.encode();
    let traits    = record.traits.encode();
    let start     = encode_dt(record.timing.start);
    let end       = encode_dt(record.timing.end);
    let length    = record.timing.duration_secs;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO matches (
             player, puuid, match_id, placement, augments, traits,
             start_timestamp, end_timestamp, match_length
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            player, puuid, match_id, placement, augments, traits, start, end, length,
          ],
        )?)
      })
      .await?;

    let outcome = if changed > 0 {
      InsertOutcome::Inserted
    } else {
      InsertOutcome::Duplicate
    };
    tracing::debug!(match_id = %record.match_id, ?outcome, "insert match");
    Ok(outcome)
  }

  async fn placement_summaries(&self) -> Result<Vec<PlacementSummary>> {
    let summaries = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT player, COUNT(*), AVG(placement)
             FROM matches
            WHERE player IS NOT NULL AND placement IS NOT NULL
            GROUP BY player
            ORDER BY player",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PlacementSummary {
              player:         row.get(0)?,
              games:          row.get::<_, i64>(1)? as u64,
              mean_placement: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(summaries)
  }

  async fn record_rank(&self, snapshot: &RankSnapshot) -> Result<()> {
    let summoner_id   = snapshot.summoner_id.clone();
    let summoner_name = snapshot.summoner_name.clone();
    let rank_tier     = snapshot.rank_tier.clone();
    let league_points = snapshot.league_points;
    let timestamp     = encode_dt(snapshot.captured_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rank_history (
             summoner_id, summoner_name, rank_tier, league_points, timestamp
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![summoner_id, summoner_name, rank_tier, league_points, timestamp],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn count_matches(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM matches", [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }

  async fn match_ids(&self) -> Result<Vec<String>> {
    let ids = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT match_id FROM matches WHERE match_id IS NOT NULL ORDER BY id")?;
        let ids = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
      })
      .await?;
    Ok(ids)
  }

  async fn matches_for(&self, puuid: &str) -> Result<Vec<StoredMatch>> {
    let puuid = puuid.to_owned();
    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM matches WHERE puuid = ?1 ORDER BY start_timestamp, id",
          RawMatch::COLUMNS
        ))?;
        let rows = stmt
          .query_map([puuid], RawMatch::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_stored).collect()
  }

  async fn rank_history(&self, summoner_name: &str) -> Result<Vec<StoredRank>> {
    let name = summoner_name.to_owned();
    let raws: Vec<RawRank> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, summoner_id, summoner_name, rank_tier, league_points, timestamp
             FROM rank_history WHERE summoner_name = ?1 ORDER BY id",
        )?;
        let rows = stmt
          .query_map([name], |row| {
            Ok(RawRank {
              id:            row.get(0)?,
              summoner_id:   row.get(1)?,
              summoner_name: row.get(2)?,
              rank_tier:     row.get(3)?,
              league_points: row.get(4)?,
              timestamp:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRank::into_stored).collect()
  }
}
