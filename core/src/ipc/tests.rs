//! Unit tests for IPC parsing and the host -> UI wire shapes.

use super::*;
use serde_json::json;

#[test]
fn parse_message_config_get() {
    let raw = r#"{"id":"abc-123","name":"config:get"}"#;
    let env = parse_message(raw).expect("valid");
    assert_eq!(env.id, "abc-123");
    assert!(matches!(env.request, Request::ConfigGet));
    assert_eq!(env.request.name(), CONFIG_GET);
}

#[test]
fn parse_message_config_save_keeps_raw_payload() {
    let raw = r#"{"id":"7","name":"config:save","config":{"timeinterval":3,"slides":[{"a":1}]}}"#;
    let env = parse_message(raw).expect("valid");
    match env.request {
        Request::ConfigSave { config } => {
            assert_eq!(config, json!({ "timeinterval": 3, "slides": [{ "a": 1 }] }));
        }
        other => panic!("unexpected request: {:?}", other),
    }
}

#[test]
fn parse_message_clipboard_write() {
    let raw = r#"{"id":"9","name":"clipboard:write","text":"hello"}"#;
    let env = parse_message(raw).expect("valid");
    assert!(matches!(env.request, Request::ClipboardWrite { ref text } if text == "hello"));
}

#[test]
fn parse_message_invalid_returns_none() {
    assert!(parse_message("").is_none());
    assert!(parse_message("{}").is_none());
    assert!(parse_message("not json").is_none());
    assert!(parse_message(r#"{"id":"1","name":"config:delete"}"#).is_none());
    assert!(parse_message(r#"{"name":"config:get"}"#).is_none());
    assert!(parse_message(r#"{"id":"1","name":"config:save"}"#).is_none());
}

#[test]
fn response_shape() {
    let resp = IpcResponse::ok("42".to_string(), json!(true));
    assert_eq!(serde_json::to_value(&resp).unwrap(), json!({ "id": "42", "ok": true }));
}

#[test]
fn notification_shapes() {
    let loaded = Notification::ConfigLoaded(SlideConfig::default());
    assert_eq!(
        serde_json::to_value(&loaded).unwrap(),
        json!({ "channel": "config:loaded", "payload": { "timeinterval": 10, "slides": [] } })
    );
    assert_eq!(loaded.channel(), CONFIG_LOADED);

    let toggle = Notification::TogglePanel;
    assert_eq!(
        serde_json::to_value(&toggle).unwrap(),
        json!({ "channel": "toggle-panel" })
    );
    assert_eq!(toggle.channel(), TOGGLE_PANEL);
}
