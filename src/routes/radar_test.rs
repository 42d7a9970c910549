use super::*;
use crate::config::RelayConfig;
use crate::state::test_helpers::{render_json, spawn_app, test_app_state, test_app_state_with};

#[test]
fn publish_error_to_status_maps_unauthorized() {
    assert_eq!(publish_error_to_status(&PublishError::Unauthorized), StatusCode::UNAUTHORIZED);
}

#[test]
fn publish_error_to_status_maps_invalid() {
    let err = PublishError::Invalid(wire::WireError::MissingCommand);
    assert_eq!(publish_error_to_status(&err), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn latest_is_no_content_before_first_publish() {
    let addr = spawn_app(test_app_state()).await;
    let response = reqwest::get(format!("http://{addr}/radar.json")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn post_then_get_round_trips_raw_text() {
    let addr = spawn_app(test_app_state()).await;
    let client = reqwest::Client::new();
    let raw = render_json("Haven", 3);

    let posted = client.post(format!("http://{addr}/radar.json")).body(raw.clone()).send().await.unwrap();
    assert_eq!(posted.status(), reqwest::StatusCode::ACCEPTED);
    let ack: serde_json::Value = posted.json().await.unwrap();
    assert_eq!(ack["seq"], 1);

    let got = client.get(format!("http://{addr}/radar.json")).send().await.unwrap();
    assert_eq!(got.status(), reqwest::StatusCode::OK);
    assert_eq!(got.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(got.headers()[SEQ_HEADER], "1");
    assert_eq!(got.text().await.unwrap(), raw);
}

#[tokio::test]
async fn malformed_post_is_bad_request() {
    let state = test_app_state();
    let addr = spawn_app(state.clone()).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/radar.json"))
        .body(r#"{"command":"render","entity_count":1,"players":[]}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(state.latest().is_none());
}

#[tokio::test]
async fn token_is_enforced_when_configured() {
    let config = RelayConfig { publish_token: Some("s3cret".into()), ..RelayConfig::default() };
    let addr = spawn_app(test_app_state_with(config)).await;
    let client = reqwest::Client::new();
    let raw = render_json("Lotus", 0);

    let denied = client.post(format!("http://{addr}/radar.json?token=nope")).body(raw.clone()).send().await.unwrap();
    assert_eq!(denied.status(), reqwest::StatusCode::UNAUTHORIZED);

    let missing = client.post(format!("http://{addr}/radar.json")).body(raw.clone()).send().await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::UNAUTHORIZED);

    let allowed = client.post(format!("http://{addr}/radar.json?token=s3cret")).body(raw).send().await.unwrap();
    assert_eq!(allowed.status(), reqwest::StatusCode::ACCEPTED);
}

#[tokio::test]
async fn non_render_command_replaces_latest() {
    let addr = spawn_app(test_app_state()).await;
    let client = reqwest::Client::new();
    client.post(format!("http://{addr}/radar.json")).body(render_json("Split", 1)).send().await.unwrap();
    let idle = client.post(format!("http://{addr}/radar.json")).body(r#"{"command":"idle"}"#).send().await.unwrap();
    assert_eq!(idle.status(), reqwest::StatusCode::ACCEPTED);

    let got = client.get(format!("http://{addr}/radar.json")).send().await.unwrap();
    assert_eq!(got.headers()[SEQ_HEADER], "2");
    assert_eq!(got.text().await.unwrap(), r#"{"command":"idle"}"#);
}
