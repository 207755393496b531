//! Riot IDs and resolved accounts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A `(game name, tag line)` pair as typed by players, e.g. `SuperHandi#NA1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiotId {
  pub game_name: String,
  pub tag_line:  String,
}

impl RiotId {
  pub fn new(game_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
    Self {
      game_name: game_name.into(),
      tag_line:  tag_line.into(),
    }
  }
}

impl fmt::Display for RiotId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}#{}", self.game_name, self.tag_line)
  }
}

impl FromStr for RiotId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (name, tag) = s
      .trim()
      .split_once('#')
      .ok_or_else(|| Error::InvalidRiotId(s.to_owned()))?;
    let (name, tag) = (name.trim(), tag.trim());
    if name.is_empty() || tag.is_empty() || tag.contains('#') {
      return Err(Error::InvalidRiotId(s.to_owned()));
    }
    Ok(Self::new(name, tag))
  }
}

/// A configured Riot ID resolved to its stable account identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
  pub riot_id:      RiotId,
  /// Opaque per-account identifier, stable across renames.
  pub puuid:        String,
  pub display_name: String,
}

impl Account {
  /// The `"{game name}#{tag line}"` key this account is tracked under.
  pub fn key(&self) -> String { self.riot_id.to_string() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_name_and_tag() {
    let id: RiotId = "SuperHandi#NA1".parse().unwrap();
    assert_eq!(id, RiotId::new("SuperHandi", "NA1"));
    assert_eq!(id.to_string(), "SuperHandi#NA1");
  }

  #[test]
  fn trims_whitespace_and_keeps_inner_spaces() {
    let id: RiotId = "  Big Cactus # NA1 ".parse().unwrap();
    assert_eq!(id.game_name, "Big Cactus");
    assert_eq!(id.tag_line, "NA1");
  }

  #[test]
  fn rejects_malformed_ids() {
    for bad in ["NoTag", "#NA1", "Name#", "a#b#c", ""] {
      assert!(bad.parse::<RiotId>().is_err(), "{bad:?} should not parse");
    }
  }
}
