//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored in UTC as `YYYY-MM-DD HH:MM:SS.fff`, which sorts
//! lexicographically so `MAX(start_timestamp)` is the newest start. Older rows
//! may use a `T` separator or carry no (or microsecond) fractional part; all
//! of these decode. Unversioned databases hold local wall-clock time instead;
//! the migration rewrites those to UTC before anything reads them.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::ValueRef;
use tft_core::{
  list::IdList,
  record::{RankSnapshot, StoredMatch, StoredRank},
  time::MatchTiming,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.format(DT_FORMAT).to_string() }

/// Parse a stored timestamp without assigning it a zone.
pub fn parse_naive(s: &str) -> Option<NaiveDateTime> {
  ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  parse_naive(s)
    .map(|naive| naive.and_utc())
    .ok_or_else(|| Error::DateParse(format!("unrecognised timestamp: {s:?}")))
}

// ─── Table dumps ─────────────────────────────────────────────────────────────

pub fn render_value(value: ValueRef<'_>) -> String {
  match value {
    ValueRef::Null => "NULL".to_owned(),
    ValueRef::Integer(i) => i.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
    ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `matches` row.
pub struct RawMatch {
  pub id:              i64,
  pub player:          Option<String>,
  pub puuid:           Option<String>,
  pub match_id:        Option<String>,
  pub placement:       Option<i64>,
  pub augments:        Option<String>,
  pub traits:          Option<String>,
  pub start_timestamp: Option<String>,
  pub end_timestamp:   Option<String>,
  pub match_length:    Option<f64>,
}

impl RawMatch {
  pub const COLUMNS: &'static str = "id, player, puuid, match_id, placement, augments, traits, \
                                     start_timestamp, end_timestamp, match_length";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      player:          row.get(1)?,
      puuid:           row.get(2)?,
      match_id:        row.get(3)?,
      placement:       row.get(4)?,
      augments:        row.get(5)?,
      traits:          row.get(6)?,
      start_timestamp: row.get(7)?,
      end_timestamp:   row.get(8)?,
      match_length:    row.get(9)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredMatch> {
    let timing = match (self.start_timestamp, self.end_timestamp, self.match_length) {
      (Some(start), Some(end), Some(duration_secs)) => Some(MatchTiming {
        start: decode_dt(&start)?,
        end: decode_dt(&end)?,
        duration_secs,
      }),
      _ => None,
    };

    Ok(StoredMatch {
      id: self.id,
      player: self.player.unwrap_or_default(),
      puuid: self.puuid.unwrap_or_default(),
      match_id: self.match_id.unwrap_or_default(),
      placement: self.placement.unwrap_or_default(),
      augments: IdList::decode(self.augments.as_deref().unwrap_or_default())?,
      traits: IdList::decode(self.traits.as_deref().unwrap_or_default())?,
      timing,
    })
  }
}

/// Raw values read directly from a `rank_history` row.
pub struct RawRank {
  pub id:            i64,
  pub summoner_id:   Option<String>,
  pub summoner_name: Option<String>,
  pub rank_tier:     Option<String>,
  pub league_points: Option<i64>,
  pub timestamp:     String,
}

impl RawRank {
  pub fn into_stored(self) -> Result<StoredRank> {
    Ok(StoredRank {
      id:       self.id,
      snapshot: RankSnapshot {
        summoner_id:   self.summoner_id.unwrap_or_default(),
        summoner_name: self.summoner_name.unwrap_or_default(),
        rank_tier:     self.rank_tier.unwrap_or_default(),
        league_points: self.league_points.unwrap_or_default(),
        captured_at:   decode_dt(&self.timestamp)?,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn encodes_with_millisecond_precision() {
    let dt = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let s = encode_dt(dt);
    assert_eq!(s, "2023-11-14 22:13:20.123");
    assert_eq!(decode_dt(&s).unwrap(), dt);
  }

  #[test]
  fn decodes_legacy_forms() {
    let whole = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    assert_eq!(decode_dt("2023-11-14 22:13:20").unwrap(), whole);
    assert_eq!(decode_dt("2023-11-14T22:13:20").unwrap(), whole);
    assert_eq!(
      decode_dt("2023-11-14 22:13:20.500000").unwrap(),
      Utc.timestamp_millis_opt(1_700_000_000_500).unwrap(),
    );
    assert!(decode_dt("yesterday").is_err());
  }
}
