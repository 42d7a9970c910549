use std::time::Duration;

use super::*;
use crate::config::RelayConfig;
use crate::state::test_helpers::{spawn_app, test_app_state, test_app_state_with};

#[tokio::test]
async fn healthz_returns_ok() {
    let addr = spawn_app(test_app_state()).await;
    let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn actors_json_serves_agent_table() {
    let addr = spawn_app(test_app_state()).await;
    let body: serde_json::Value = reqwest::get(format!("http://{addr}/actors.json")).await.unwrap().json().await.unwrap();
    assert_eq!(body["agents"], serde_json::json!(["Astra", "Breach", "Sova"]));
    assert_eq!(body["total_agents"], 3);
}

#[tokio::test]
async fn weapons_json_serves_weapon_table() {
    let addr = spawn_app(test_app_state()).await;
    let body: serde_json::Value = reqwest::get(format!("http://{addr}/weapons.json")).await.unwrap().json().await.unwrap();
    assert_eq!(body["weapons"], serde_json::json!(["Classic", "Vandal"]));
    assert_eq!(body["total_weapons"], 2);
}

#[tokio::test]
async fn unknown_paths_fall_back_to_static_dir() {
    let dir = std::env::temp_dir().join(format!("radar-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(dir.join("assets/maps")).unwrap();
    std::fs::write(dir.join("index.html"), "<canvas id=radar></canvas>").unwrap();
    std::fs::write(dir.join("assets/maps/Ascent.png"), b"png").unwrap();

    let config = RelayConfig { static_dir: dir, push_interval: Duration::from_millis(5), ..RelayConfig::default() };
    let addr = spawn_app(test_app_state_with(config)).await;

    let index = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(index.status(), reqwest::StatusCode::OK);
    assert_eq!(index.text().await.unwrap(), "<canvas id=radar></canvas>");

    let map = reqwest::get(format!("http://{addr}/assets/maps/Ascent.png")).await.unwrap();
    assert_eq!(map.bytes().await.unwrap().as_ref(), b"png");

    let missing = reqwest::get(format!("http://{addr}/assets/maps/Nowhere.png")).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let addr = spawn_app(test_app_state()).await;
    let response = reqwest::Client::new()
        .get(format!("http://{addr}/healthz"))
        .header("origin", "http://overlay.local")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
