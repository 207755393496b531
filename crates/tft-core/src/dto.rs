//! Response bodies of the upstream Riot Games endpoints.
//!
//! Only the fields the tracker reads are modelled; everything else in the
//! payloads is ignored on deserialisation.

use serde::{Deserialize, Serialize};

/// Queue type whose league entry is reported as a player's rank.
pub const RANKED_QUEUE: &str = "RANKED_TFT";

/// `riot/account/v1/accounts/by-riot-id/{gameName}/{tagLine}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
  pub puuid:     String,
  #[serde(default)]
  pub game_name: Option<String>,
  #[serde(default)]
  pub tag_line:  Option<String>,
}

/// `tft/match/v1/matches/{matchId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDto {
  pub metadata: MetadataDto,
  pub info:     InfoDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDto {
  pub match_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoDto {
  /// Start instant, milliseconds since the Unix epoch.
  pub game_datetime: i64,
  /// Length in seconds.
  #[serde(default)]
  pub game_length:   f64,
  #[serde(default)]
  pub participants:  Vec<ParticipantDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDto {
  pub puuid:     String,
  #[serde(default)]
  pub placement: i64,
  #[serde(default)]
  pub augments:  Vec<String>,
  #[serde(default)]
  pub traits:    Vec<TraitDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDto {
  pub name:         String,
  #[serde(default)]
  pub tier_current: i64,
}

/// One element of `tft/league/v1/by-puuid/{puuid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
  pub queue_type:    String,
  #[serde(default)]
  pub tier:          Option<String>,
  /// Division within the tier, e.g. `"II"`.
  #[serde(default)]
  pub rank:          Option<String>,
  #[serde(default)]
  pub league_points: Option<i64>,
  #[serde(default)]
  pub summoner_id:   Option<String>,
}

impl MatchDto {
  /// The participant entry belonging to `puuid`, if any.
  pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
    self.info.participants.iter().find(|p| p.puuid == puuid)
  }
}

impl ParticipantDto {
  /// Names of traits that were actually active (`tier_current > 0`), in
  /// upstream order.
  pub fn active_traits(&self) -> impl Iterator<Item = &str> {
    self
      .traits
      .iter()
      .filter(|t| t.tier_current > 0)
      .map(|t| t.name.as_str())
  }
}

impl LeagueEntryDto {
  /// `"Gold II"` style label, or `None` for entries without a tier (e.g.
  /// Hyper Roll queues).
  pub fn rank_label(&self) -> Option<String> {
    let tier = self.tier.as_deref()?;
    let mut label = capitalize(tier);
    if let Some(rank) = self.rank.as_deref() {
      label.push(' ');
      label.push_str(rank);
    }
    Some(label)
  }
}

/// Find the entry for [`RANKED_QUEUE`].
pub fn ranked_entry(entries: &[LeagueEntryDto]) -> Option<&LeagueEntryDto> {
  entries.iter().find(|e| e.queue_type == RANKED_QUEUE)
}

/// `"GOLD"` → `"Gold"`.
fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn participant(traits: &[(&str, i64)]) -> ParticipantDto {
    ParticipantDto {
      puuid:     "p".into(),
      placement: 3,
      augments:  vec![],
      traits:    traits
        .iter()
        .map(|(name, tier)| TraitDto {
          name:         (*name).into(),
          tier_current: *tier,
        })
        .collect(),
    }
  }

  #[test]
  fn inactive_traits_are_dropped() {
    let p = participant(&[("Set9_Bruiser", 0), ("Set9_Sorcerer", 1), ("Set9_Void", 3)]);
    let active: Vec<_> = p.active_traits().collect();
    assert_eq!(active, ["Set9_Sorcerer", "Set9_Void"]);
  }

  #[test]
  fn match_payload_defaults_missing_fields() {
    let json = r#"{
      "metadata": {"match_id": "NA1_1", "data_version": "5"},
      "info": {
        "game_datetime": 1700000000000,
        "game_length": 1800.5,
        "participants": [{"puuid": "abc", "placement": 2, "level": 9}]
      }
    }"#;
    let m: MatchDto = serde_json::from_str(json).unwrap();
    let p = m.participant("abc").unwrap();
    assert_eq!(p.placement, 2);
    assert!(p.augments.is_empty());
    assert!(p.traits.is_empty());
    assert!(m.participant("someone-else").is_none());
  }

  #[test]
  fn rank_label_capitalizes_tier() {
    let entries: Vec<LeagueEntryDto> = serde_json::from_str(
      r#"[
        {"queueType": "RANKED_TFT_TURBO", "ratedTier": "ORANGE"},
        {"queueType": "RANKED_TFT", "tier": "DIAMOND", "rank": "IV", "leaguePoints": 42}
      ]"#,
    )
    .unwrap();
    let entry = ranked_entry(&entries).unwrap();
    assert_eq!(entry.rank_label().as_deref(), Some("Diamond IV"));
    assert_eq!(entry.league_points, Some(42));
    assert_eq!(entries[0].rank_label(), None);
  }
}
