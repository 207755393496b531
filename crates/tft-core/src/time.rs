//! Conversions between upstream time values and [`chrono`] types.
//!
//! Upstream reports match start instants as milliseconds since the Unix
//! epoch and match lengths as fractional seconds. Match-list lower bounds are
//! whole epoch seconds.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Error, Result};

pub fn from_epoch_millis(ms: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ms).ok_or(Error::TimestampOutOfRange(ms))
}

/// Lower bound for a match-list request, given the newest stored start.
///
/// Truncates to the whole second, so the bound is never later than `latest`.
pub fn lower_bound_secs(latest: DateTime<Utc>) -> i64 { latest.timestamp() }

/// Start, end and length of one match, all derived from the same two
/// upstream fields so that `end - start == duration` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTiming {
  pub start:         DateTime<Utc>,
  pub end:           DateTime<Utc>,
  pub duration_secs: f64,
}

impl MatchTiming {
  pub fn from_upstream(game_datetime_ms: i64, game_length_secs: f64) -> Result<Self> {
    if !game_length_secs.is_finite() || game_length_secs < 0.0 {
      return Err(Error::InvalidLength(game_length_secs));
    }
    let start = from_epoch_millis(game_datetime_ms)?;
    let length = TimeDelta::milliseconds(length_millis(game_length_secs));
    let end = start
      .checked_add_signed(length)
      .ok_or(Error::TimestampOutOfRange(game_datetime_ms))?;
    Ok(Self {
      start,
      end,
      duration_secs: game_length_secs,
    })
  }

  /// `end - start` in milliseconds.
  pub fn span_millis(&self) -> i64 { (self.end - self.start).num_milliseconds() }

  /// Whether the stored end agrees with the stored length, to the millisecond.
  pub fn is_consistent(&self) -> bool {
    self.duration_secs.is_finite()
      && self.span_millis() == length_millis(self.duration_secs)
  }
}

fn length_millis(secs: f64) -> i64 { (secs * 1000.0).round() as i64 }
