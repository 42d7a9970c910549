use super::*;
use crate::state::test_helpers::{render_json, test_app_state};

#[test]
fn open_relay_accepts_any_token() {
    let config = RelayConfig::default();
    assert!(authorize(&config, None).is_ok());
    assert!(authorize(&config, Some("anything")).is_ok());
}

#[test]
fn configured_token_must_match() {
    let config = RelayConfig { publish_token: Some("s3cret".into()), ..RelayConfig::default() };
    assert!(authorize(&config, Some("s3cret")).is_ok());
    assert!(matches!(authorize(&config, Some("wrong")), Err(PublishError::Unauthorized)));
    assert!(matches!(authorize(&config, None), Err(PublishError::Unauthorized)));
}

#[test]
fn render_message_is_stored_verbatim() {
    let state = test_app_state();
    let raw = render_json("Ascent", 2);
    let published = publish(&state, &raw).unwrap();
    assert_eq!(published.seq, 1);
    assert_eq!(published.command, "render");
    assert_eq!(state.latest().unwrap().raw, raw);
}

#[test]
fn other_command_is_relayed() {
    let state = test_app_state();
    publish(&state, &render_json("Ascent", 1)).unwrap();
    let published = publish(&state, r#"{"command":"menu","extra":[1,2]}"#).unwrap();
    assert_eq!(published.seq, 2);
    assert_eq!(published.command, "menu");
    assert_eq!(latest_or_idle(&state), r#"{"command":"menu","extra":[1,2]}"#);
}

#[test]
fn invalid_messages_leave_latest_untouched() {
    let state = test_app_state();
    let raw = render_json("Bind", 1);
    publish(&state, &raw).unwrap();

    let mut mismatched: serde_json::Value = serde_json::from_str(&render_json("Bind", 2)).unwrap();
    mismatched["entity_count"] = serde_json::json!(5);
    let mismatched = mismatched.to_string();

    for bad in ["not json", r#"{"players":[]}"#, r#"{"command":"render"}"#, mismatched.as_str()] {
        assert!(matches!(publish(&state, bad), Err(PublishError::Invalid(_))), "accepted {bad}");
    }
    let latest = state.latest().unwrap();
    assert_eq!(latest.raw, raw);
    assert_eq!(latest.seq, 1);
}

#[test]
fn idle_before_first_publish() {
    let state = test_app_state();
    assert_eq!(latest_or_idle(&state), IDLE_MESSAGE);
}

#[test]
fn error_message_shape() {
    let value: serde_json::Value = serde_json::from_str(&error_message("bad \"input\"")).unwrap();
    assert_eq!(value["command"], "error");
    assert_eq!(value["message"], "bad \"input\"");
}
