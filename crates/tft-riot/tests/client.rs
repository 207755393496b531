//! `RiotClient` against a local stand-in for the Riot endpoints.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
  routing::get,
};
use serde_json::json;
use tft_core::{
  account::RiotId,
  api::{MatchListQuery, StatsApi, UpstreamError},
};
use tft_riot::{RiotClient, RiotConfig};

const KEY: &str = "RGAPI-test";

#[derive(Clone, Default)]
struct Seen {
  queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
  headers.get("x-riot-token").and_then(|v| v.to_str().ok()) == Some(KEY)
}

async fn account(headers: HeaderMap, Path((name, tag)): Path<(String, String)>) -> Response {
  if !authorized(&headers) {
    return (StatusCode::FORBIDDEN, "forbidden").into_response();
  }
  if name == "Nobody" {
    return (StatusCode::NOT_FOUND, r#"{"status":{"status_code":404}}"#).into_response();
  }
  Json(json!({ "puuid": format!("puuid-{name}"), "gameName": name, "tagLine": tag }))
    .into_response()
}

async fn match_ids(
  State(seen): State<Seen>,
  Path(puuid): Path<String>,
  Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<String>> {
  seen.queries.lock().unwrap().push(query);
  Json(vec![format!("NA1_{puuid}_2"), format!("NA1_{puuid}_1")])
}

async fn match_detail(Path(id): Path<String>) -> Response {
  if id == "NA1_garbled" {
    return "not json".into_response();
  }
  Json(json!({
    "metadata": { "match_id": id, "participants": ["p1"] },
    "info": {
      "game_datetime": 1_700_000_000_000_i64,
      "game_length": 1999.5,
      "participants": [{
        "puuid": "p1",
        "placement": 1,
        "augments": ["TFT9_Augment_A"],
        "traits": [{ "name": "Set9_Slayer", "tier_current": 2, "num_units": 4 }]
      }]
    }
  }))
  .into_response()
}

async fn league(Path(puuid): Path<String>) -> Json<serde_json::Value> {
  Json(json!([{
    "queueType": "RANKED_TFT",
    "tier": "PLATINUM",
    "rank": "III",
    "leaguePoints": 12,
    "puuid": puuid
  }]))
}

async fn serve() -> (RiotClient, String, Seen) {
  let seen = Seen::default();
  let app = Router::new()
    .route("/riot/account/v1/accounts/by-riot-id/{name}/{tag}", get(account))
    .route("/tft/match/v1/matches/by-puuid/{puuid}/ids", get(match_ids))
    .route("/tft/match/v1/matches/{id}", get(match_detail))
    .route("/tft/league/v1/by-puuid/{puuid}", get(league))
    .with_state(seen.clone());

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let base = format!("http://{}", listener.local_addr().unwrap());
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

  let client = RiotClient::new(RiotConfig {
    platform_base_url: base.clone(),
    regional_base_url: base.clone(),
    ..RiotConfig::for_routing(KEY, "na1", "americas")
  })
  .unwrap();
  (client, base, seen)
}

#[tokio::test]
async fn resolves_account_with_encoded_name() {
  let (client, _, _) = serve().await;
  let account = client
    .account_by_riot_id(&RiotId::new("Big Cactus", "NA1"))
    .await
    .unwrap();
  assert_eq!(account.puuid, "puuid-Big Cactus");
  assert_eq!(account.tag_line.as_deref(), Some("NA1"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
  let (client, _, _) = serve().await;
  let err = client
    .account_by_riot_id(&RiotId::new("Nobody", "NA1"))
    .await
    .unwrap_err();
  assert_eq!(err.status(), Some(404));
  assert!(err.url().unwrap().ends_with("/by-riot-id/Nobody/NA1"));
  assert!(err.body().unwrap().contains("status_code"));
}

#[tokio::test]
async fn wrong_key_is_rejected() {
  let (_, base, _) = serve().await;
  let client = RiotClient::new(RiotConfig {
    platform_base_url: base.clone(),
    regional_base_url: base,
    ..RiotConfig::for_routing("RGAPI-wrong", "na1", "americas")
  })
  .unwrap();

  let err = client
    .account_by_riot_id(&RiotId::new("Someone", "NA1"))
    .await
    .unwrap_err();
  assert_eq!(err.status(), Some(403));
}

#[test]
fn invalid_base_url_is_rejected() {
  let config = RiotConfig {
    regional_base_url: "not a url".into(),
    ..RiotConfig::for_routing(KEY, "na1", "americas")
  };
  assert!(matches!(RiotClient::new(config), Err(tft_riot::Error::InvalidBaseUrl(_))));
}

#[tokio::test]
async fn match_list_sends_count_and_lower_bound() {
  let (client, _, seen) = serve().await;

  let ids = client
    .match_ids("p1", MatchListQuery { start_time: None, count: 50 })
    .await
    .unwrap();
  assert_eq!(ids, ["NA1_p1_2", "NA1_p1_1"]);

  client
    .match_ids("p1", MatchListQuery { start_time: Some(1_700_000_000), count: 50 })
    .await
    .unwrap();

  let queries = seen.queries.lock().unwrap();
  assert_eq!(queries[0].get("count").map(String::as_str), Some("50"));
  assert!(!queries[0].contains_key("startTime"));
  assert_eq!(queries[1].get("startTime").map(String::as_str), Some("1700000000"));
}

#[tokio::test]
async fn match_detail_decodes() {
  let (client, _, _) = serve().await;
  let detail = client.match_detail("NA1_42").await.unwrap();
  assert_eq!(detail.metadata.match_id, "NA1_42");
  assert_eq!(detail.info.game_length, 1999.5);
  let p = detail.participant("p1").unwrap();
  assert_eq!(p.active_traits().collect::<Vec<_>>(), ["Set9_Slayer"]);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
  let (client, _, _) = serve().await;
  let err = client.match_detail("NA1_garbled").await.unwrap_err();
  assert!(matches!(err, tft_riot::Error::Decode { .. }));
  assert_eq!(err.status(), None);
}

#[tokio::test]
async fn league_entries_use_platform_host() {
  let (client, _, _) = serve().await;
  let entries = client.league_entries("p1").await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].rank_label().as_deref(), Some("Platinum III"));
}
