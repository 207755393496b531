//! Layered tracker configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! the process environment (`API_KEY`, `REGION`, `CONTINENT`, `MATCH_COUNT`,
//! `DB_PATH`, `PLAYERS`), then explicit overrides from the command line.
//! A `.env` file is loaded into the environment by the binary beforehand.

use std::{
  fmt,
  path::{Path, PathBuf},
};

use serde::Deserialize;
use tft_core::account::RiotId;

use crate::{Error, Result};

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub db_path:     Option<PathBuf>,
  pub match_count: Option<u32>,
}

#[derive(Clone, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub api_key:     String,
  /// Platform routing value used for league lookups, e.g. `na1`.
  pub region:      String,
  /// Regional routing value used for accounts and matches, e.g. `americas`.
  pub continent:   String,
  /// Ceiling on match IDs requested per account per run.
  pub match_count: u32,
  pub db_path:     PathBuf,
  /// `Name#TAG` entries, in report order.
  #[serde(default)]
  pub players:     Vec<String>,
}

impl Settings {
  pub fn load(file: &Path, overrides: &Overrides) -> Result<Self> {
    Self::load_from(file, None, overrides)
  }

  /// [`Settings::load`] reading `env` instead of the process environment when
  /// it is given.
  fn load_from(
    file: &Path,
    env: Option<config::Map<String, String>>,
    overrides: &Overrides,
  ) -> Result<Self> {
    let settings = config::Config::builder()
      .set_default("region", "na1")?
      .set_default("continent", "americas")?
      .set_default("match_count", 20)?
      .set_default("db_path", "tft_matches.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::default()
          .source(env)
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("players"),
      )
      .set_override_option(
        "db_path",
        overrides.db_path.as_ref().map(|p| p.display().to_string()),
      )?
      .set_override_option("match_count", overrides.match_count.map(u64::from))?
      .build()?;

    Ok(settings.try_deserialize()?)
  }

  pub fn api_key(&self) -> Result<&str> {
    match self.api_key.trim() {
      "" => Err(Error::MissingSetting("api_key")),
      key => Ok(key),
    }
  }

  /// The configured players as Riot IDs. Fails on the first malformed entry
  /// or if none are configured.
  pub fn roster(&self) -> Result<Vec<RiotId>> {
    let roster = self
      .players
      .iter()
      .map(|p| p.parse())
      .collect::<Result<Vec<RiotId>, _>>()?;
    if roster.is_empty() {
      return Err(Error::MissingSetting("players"));
    }
    Ok(roster)
  }
}

impl fmt::Debug for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Settings")
      .field("api_key", &"<redacted>")
      .field("region", &self.region)
      .field("continent", &self.continent)
      .field("match_count", &self.match_count)
      .field("db_path", &self.db_path)
      .field("players", &self.players)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings(players: &[&str], api_key: &str) -> Settings {
    Settings {
      api_key:     api_key.into(),
      region:      "na1".into(),
      continent:   "americas".into(),
      match_count: 20,
      db_path:     "tft_matches.db".into(),
      players:     players.iter().map(|p| (*p).to_owned()).collect(),
    }
  }

  #[test]
  fn roster_parses_in_order() {
    let s = settings(&["SuperHandi#NA1", "TyphoonCEO#NA1"], "k");
    let roster = s.roster().unwrap();
    assert_eq!(roster[0].game_name, "SuperHandi");
    assert_eq!(roster[1].game_name, "TyphoonCEO");
  }

  #[test]
  fn empty_roster_or_key_is_rejected() {
    assert!(matches!(settings(&[], "k").roster(), Err(Error::MissingSetting("players"))));
    assert!(matches!(settings(&["A#NA1"], " ").api_key(), Err(Error::MissingSetting("api_key"))));
    assert!(matches!(settings(&["bogus"], "k").roster(), Err(Error::Roster(_))));
  }

  #[test]
  fn debug_output_hides_the_key() {
    let s = settings(&["A#NA1"], "RGAPI-secret");
    assert!(!format!("{s:?}").contains("RGAPI-secret"));
  }

  #[test]
  fn file_values_and_overrides_layer() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("tft-tracker.toml");
    std::fs::write(
      &file,
      "region = \"euw1\"\ncontinent = \"europe\"\nmatch_count = 5\nplayers = [\"A#EUW\"]\n",
    )
    .unwrap();

    let s = Settings::load_from(
      &file,
      Some(config::Map::new()),
      &Overrides {
        db_path:     Some("/tmp/override.db".into()),
        match_count: None,
      },
    )
    .unwrap();
    assert_eq!(s.continent, "europe");
    assert_eq!(s.db_path, PathBuf::from("/tmp/override.db"));
    assert_eq!(s.roster().unwrap(), [RiotId::new("A", "EUW")]);
  }

  #[test]
  fn environment_beats_file_and_loses_to_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("tft-tracker.toml");
    std::fs::write(
      &file,
      "region = \"kr\"\ncontinent = \"asia\"\nmatch_count = 5\nplayers = [\"C#KR\"]\n",
    )
    .unwrap();
    let env: config::Map<String, String> = [
      ("API_KEY", "RGAPI-env"),
      ("REGION", "euw1"),
      ("MATCH_COUNT", "7"),
      ("PLAYERS", "A#NA1,B Name#EUW"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();

    let s = Settings::load_from(&file, Some(env.clone()), &Overrides::default()).unwrap();
    assert_eq!(s.api_key().unwrap(), "RGAPI-env");
    assert_eq!(s.region, "euw1");
    assert_eq!(s.continent, "asia");
    assert_eq!(s.match_count, 7);
    assert_eq!(s.roster().unwrap(), [
      RiotId::new("A", "NA1"),
      RiotId::new("B Name", "EUW")
    ]);

    let s = Settings::load_from(
      &file,
      Some(env),
      &Overrides {
        db_path:     None,
        match_count: Some(9),
      },
    )
    .unwrap();
    assert_eq!(s.match_count, 9);
  }
}
