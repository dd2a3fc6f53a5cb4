//! HTTP API against a live catalog service and a SQLite play store

mod common;

use axum::{extract::Query, routing::get, Json, Router};
use common::{football_bet, open_bet, sqlite_store};
use playslip::config::{CatalogConfig, PlayConfig};
use playslip::{Bet, BetId, FixedClock, HttpBetCatalog, MessageService, PlayApi, PlayService};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Catalog service answering `GET /bets?ids=` from a fixed set of bets
async fn spawn_catalog(bets: Vec<Bet>) -> String {
    let bets: Arc<HashMap<BetId, Bet>> = Arc::new(bets.into_iter().map(|b| (b.id, b)).collect());
    let router = Router::new().route(
        "/bets",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let bets = bets.clone();
            async move {
                let found: Vec<Bet> = params
                    .get("ids")
                    .map(|ids| {
                        ids.split(',')
                            .filter_map(|id| id.parse::<BetId>().ok())
                            .filter_map(|id| bets.get(&id).cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                Json(found)
            }
        }),
    );
    spawn(router).await
}

async fn spawn_api(catalog_url: String) -> String {
    let catalog = HttpBetCatalog::new(&CatalogConfig {
        base_url: catalog_url,
        request_timeout: Duration::from_secs(2),
    })
    .unwrap();

    let service = PlayService::new(Arc::new(catalog), sqlite_store(), PlayConfig::default())
        .with_clock(Arc::new(FixedClock::new(common::now())));
    let api = PlayApi::new(
        Arc::new(service),
        Arc::new(MessageService::default()),
        Duration::from_secs(5),
    );
    spawn(api.router()).await
}

#[tokio::test]
async fn test_play_lifecycle_over_http() {
    let catalog = spawn_catalog(vec![football_bet(), open_bet(2, 45)]).await;
    let api = spawn_api(catalog).await;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("{}/users/21/plays", api))
        .json(&json!({"betId": 1, "choiceId": 1, "amount": 50}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
    let play: Value = created.json().await.unwrap();
    assert_eq!(play["betId"], 1);
    assert!(play["id"].as_i64().is_some());

    client
        .post(format!("{}/users/21/plays", api))
        .json(&json!({"betId": 2, "choiceId": 10, "amount": "2.5"}))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let latest: Value = client
        .get(format!("{}/users/21/plays/latest", api))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let latest = latest.as_array().unwrap();
    assert_eq!(latest.len(), 2);
    // Both registered at the same instant, so the newer id leads
    assert_eq!(latest[0]["bet"]["id"], 2);
    assert_eq!(latest[0]["choice"]["description"], "Yes");
    assert!(latest[0].get("result").is_none());
    assert_eq!(latest[1]["result"], "Home");
}

#[tokio::test]
async fn test_rejections_map_to_bad_request() {
    let catalog = spawn_catalog(vec![football_bet()]).await;
    let api = spawn_api(catalog).await;
    let client = reqwest::Client::new();

    for (body, key) in [
        (json!({"betId": 404, "choiceId": 1, "amount": 50}), "BET_NOT_VALID"),
        (json!({"betId": 1, "choiceId": 1, "amount": 5}), "BET_NOT_VALID_MIN"),
        (json!({"betId": 1, "choiceId": 1, "amount": 101}), "BET_NOT_VALID_MAX"),
        (json!({"betId": 1, "choiceId": 3, "amount": 50}), "CHOICE_NOT_VALID"),
    ] {
        let response = client
            .post(format!("{}/users/21/plays", api))
            .header("accept-language", "es")
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], key);
        assert_ne!(error["message"], key);
    }

    let latest: Value = client
        .get(format!("{}/users/21/plays/latest", api))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(latest, json!([]));
}

#[tokio::test]
async fn test_catalog_outage_is_bad_gateway() {
    // Nothing listens on the discard port
    let api = spawn_api("http://127.0.0.1:9".to_string()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/users/1/plays", api))
        .json(&json!({"betId": 1, "choiceId": 1, "amount": 50}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
}
