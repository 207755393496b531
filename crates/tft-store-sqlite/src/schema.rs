//! SQL schema for the tracker's SQLite store, and its migrations.
//!
//! Versions are tracked with `PRAGMA user_version`:
//!
//! - `0`: either an empty file, or a database written before versioning. The
//!   first tracker release wrote a weaker `matches` table (no timing columns,
//!   no uniqueness on `match_id`, no `rank_history`); later releases wrote the
//!   current layout without setting the version. Both stored timestamps as
//!   naive local wall-clock time.
//! - `2`: the current layout below, timestamps in UTC.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use rusqlite::{Connection, Transaction, params};

use crate::encode::{encode_dt, parse_naive};

pub const SCHEMA_VERSION: i64 = 2;

/// Column layout of `matches`. Kept byte-compatible with existing databases.
pub const MATCHES_DDL: &str = "
CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player TEXT,
    puuid TEXT,
    match_id TEXT UNIQUE,
    placement INTEGER,
    augments TEXT,
    traits TEXT,
    start_timestamp DATETIME,
    end_timestamp DATETIME,
    match_length DECIMAL
);
";

/// Rank snapshots. Append-only, no uniqueness.
pub const RANK_HISTORY_DDL: &str = "
CREATE TABLE IF NOT EXISTS rank_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    summoner_id TEXT,
    summoner_name TEXT,
    rank_tier TEXT,
    league_points INTEGER,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

const MATCHES_PUUID_IDX: &str =
  "CREATE INDEX IF NOT EXISTS matches_puuid_start_idx ON matches(puuid, start_timestamp);";

/// Columns of the current `matches` table, in DDL order, minus `id`.
const MATCH_COLUMNS: [&str; 9] = [
  "player",
  "puuid",
  "match_id",
  "placement",
  "augments",
  "traits",
  "start_timestamp",
  "end_timestamp",
  "match_length",
];

/// What [`migrate`] did to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
  /// Already at [`SCHEMA_VERSION`]; missing tables (e.g. after a reset) were
  /// recreated.
  Current,
  /// Empty database; tables created.
  Created,
  /// Unversioned database that already had the current layout. `localized`
  /// rows had their timestamps rewritten from local time to UTC.
  Stamped { localized: u64 },
  /// Legacy `matches` table rebuilt with the current layout.
  UpgradedLegacy {
    copied:             u64,
    dropped_duplicates: u64,
    localized:          u64,
  },
  /// Written by a newer release; left untouched.
  Unsupported(i64),
}

/// Bring the database up to [`SCHEMA_VERSION`] inside one transaction.
///
/// Timestamps found in an unversioned database are read as wall-clock time
/// in `legacy_zone` and rewritten in UTC.
pub fn migrate<Tz: TimeZone>(conn: &mut Connection, legacy_zone: &Tz) -> rusqlite::Result<Migration> {
  conn.execute_batch("PRAGMA journal_mode = WAL;")?;

  let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
  if version > SCHEMA_VERSION {
    return Ok(Migration::Unsupported(version));
  }

  let tx = conn.transaction()?;
  let migration = if version == SCHEMA_VERSION {
    Migration::Current
  } else if !table_exists(&tx, "matches")? {
    Migration::Created
  } else if has_unique_match_id(&tx)? {
    Migration::Stamped {
      localized: localize_timestamps(&tx, legacy_zone)?,
    }
  } else {
    let (copied, dropped_duplicates) = upgrade_legacy_matches(&tx)?;
    Migration::UpgradedLegacy {
      copied,
      dropped_duplicates,
      localized: localize_timestamps(&tx, legacy_zone)?,
    }
  };

  tx.execute_batch(MATCHES_DDL)?;
  tx.execute_batch(RANK_HISTORY_DDL)?;
  tx.execute_batch(MATCHES_PUUID_IDX)?;
  tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
  tx.commit()?;

  Ok(migration)
}

fn table_exists(tx: &Transaction<'_>, name: &str) -> rusqlite::Result<bool> {
  tx.query_row(
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
    [name],
    |r| r.get::<_, i64>(0),
  )
  .map(|n| n > 0)
}

fn has_unique_match_id(tx: &Transaction<'_>) -> rusqlite::Result<bool> {
  tx.query_row(
    "SELECT COUNT(*)
       FROM pragma_index_list('matches') AS il
       JOIN pragma_index_info(il.name)  AS ii
      WHERE il.\"unique\" = 1 AND ii.name = 'match_id'",
    [],
    |r| r.get::<_, i64>(0),
  )
  .map(|n| n > 0)
}

fn table_columns(tx: &Transaction<'_>, table: &str) -> rusqlite::Result<HashSet<String>> {
  let mut stmt = tx.prepare("SELECT name FROM pragma_table_info(?1)")?;
  let columns = stmt
    .query_map([table], |r| r.get(0))?
    .collect::<rusqlite::Result<HashSet<String>>>()?;
  Ok(columns)
}

/// Rebuild a pre-versioning `matches` table. Only the first row (lowest
/// `id`) of each `match_id` survives; columns the old table lacked become
/// NULL.
fn upgrade_legacy_matches(tx: &Transaction<'_>) -> rusqlite::Result<(u64, u64)> {
  let legacy = table_columns(tx, "matches")?;
  let total: i64 = tx.query_row("SELECT COUNT(*) FROM matches", [], |r| r.get(0))?;

  let mut columns = vec!["id"];
  columns.extend(MATCH_COLUMNS.iter().copied().filter(|c| legacy.contains(*c)));
  let column_list = columns.join(", ");

  tx.execute_batch("ALTER TABLE matches RENAME TO matches_legacy;")?;
  tx.execute_batch(MATCHES_DDL)?;
  let copied = tx.execute(
    &format!(
      "INSERT OR IGNORE INTO matches ({column_list})
       SELECT {column_list} FROM matches_legacy ORDER BY id"
    ),
    [],
  )?;
  tx.execute_batch("DROP TABLE matches_legacy;")?;

  let copied = copied as u64;
  Ok((copied, (total as u64).saturating_sub(copied)))
}

/// Rewrite naive `start_timestamp`/`end_timestamp` values, taken as
/// wall-clock time in `zone`, to UTC. Values that do not parse, or name a
/// wall-clock time `zone` skips, are left as they are.
fn localize_timestamps<Tz: TimeZone>(tx: &Transaction<'_>, zone: &Tz) -> rusqlite::Result<u64> {
  let rows = {
    let mut stmt = tx.prepare(
      "SELECT id, start_timestamp, end_timestamp FROM matches
        WHERE start_timestamp IS NOT NULL OR end_timestamp IS NOT NULL",
    )?;
    stmt
      .query_map([], |r| {
        Ok((
          r.get::<_, i64>(0)?,
          r.get::<_, Option<String>>(1)?,
          r.get::<_, Option<String>>(2)?,
        ))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  let to_utc = |raw: Option<String>| {
    raw.map(|text| {
      parse_naive(&text)
        .and_then(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| encode_dt(local.with_timezone(&Utc)))
        .unwrap_or(text)
    })
  };

  let mut update =
    tx.prepare("UPDATE matches SET start_timestamp = ?2, end_timestamp = ?3 WHERE id = ?1")?;
  let mut localized = 0;
  for (id, start, end) in rows {
    update.execute(params![id, to_utc(start), to_utc(end)])?;
    localized += 1;
  }
  Ok(localized)
}
