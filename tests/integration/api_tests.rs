//! Integration tests for the relay API: request in, status report out.
//!
//! Drives [`Board::handle`] with the mock adapters and checks both the
//! response and what reached the outputs and NVS.

use rhapsody_relays::api::{CONTENT_TYPE, Method, Request};
use rhapsody_relays::app::events::AppEvent;
use rhapsody_relays::error::ApiError;
use rhapsody_relays::relay::RelayState;
use serde_json::{Value, json};

use crate::mock_hw::{TestBoard, board};

fn call(b: &mut TestBoard, method: Method, uri: &str, body: &str) -> (u16, Value) {
    let resp = b.handle(&Request::new(method, uri, body.as_bytes()));
    let json: Value = serde_json::from_str(&resp.body).expect("response body is JSON");
    (resp.status, json)
}

fn relays(b: &mut TestBoard) -> Vec<String> {
    let (status, json) = call(b, Method::Get, "/infos", "");
    assert_eq!(status, 200);
    json["relays"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn all_off() -> Vec<String> {
    vec!["OFF".to_string(); 8]
}

fn all_off_json() -> Value {
    Value::from(vec!["OFF"; 8])
}

// ── /infos ────────────────────────────────────────────────────

#[test]
fn infos_reports_identity_and_relays() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Get, "/infos", "");
    assert_eq!(status, 200);
    assert_eq!(json["ssid"], "HomeNet");
    assert_eq!(json["ip_address"], "192.168.1.42");
    assert_eq!(json["hostname"], "espressif");
    assert_eq!(json["chip_id"], "a1b2c3");
    assert_eq!(json["board_type"], "rhapsody_relays");
    assert_eq!(json["relays"], all_off_json());
    assert_eq!(CONTENT_TYPE, "application/json");
}

#[test]
fn infos_rejects_other_methods() {
    let mut b = board();
    for method in [Method::Post, Method::Put, Method::Delete] {
        let (status, json) = call(&mut b, method, "/infos", "");
        assert_eq!(status, 405);
        assert_eq!(json, json!({"error": "Unauthorized method"}));
    }
}

#[test]
fn query_string_is_ignored() {
    let mut b = board();
    let (status, _) = call(&mut b, Method::Get, "/infos?verbose=1", "");
    assert_eq!(status, 200);
}

// ── /control ──────────────────────────────────────────────────

#[test]
fn control_switches_named_relays() {
    let mut b = board();
    let boot_writes = b.relays.writes.len();

    let (status, json) = call(&mut b, Method::Post, "/control", r#"{"relay1":"ON","relay3":"ON"}"#);
    assert_eq!(status, 200);
    assert_eq!(
        json["relays"],
        json!(["ON", "OFF", "ON", "OFF", "OFF", "OFF", "OFF", "OFF"])
    );

    let writes = &b.relays.writes[boot_writes..];
    assert_eq!(writes.len(), 2);
    assert_eq!((writes[0].index, writes[0].pin, writes[0].state), (0, 5, RelayState::On));
    assert_eq!((writes[1].index, writes[1].pin, writes[1].state), (2, 0, RelayState::On));
}

#[test]
fn control_turns_relays_back_off() {
    let mut b = board();
    call(&mut b, Method::Post, "/control", r#"{"relay8":"ON"}"#);
    assert_eq!(b.app.relay_state("relay8"), Some(RelayState::On));
    assert_eq!(b.relays.level(7), Some(RelayState::On));

    call(&mut b, Method::Post, "/control", r#"{"relay8":"OFF"}"#);
    assert_eq!(b.app.relay_state("relay8"), Some(RelayState::Off));
    assert_eq!(b.relays.level(7), Some(RelayState::Off));
}

#[test]
fn control_with_wrong_method_changes_nothing() {
    let mut b = board();
    let boot_writes = b.relays.writes.len();

    let (status, json) = call(&mut b, Method::Get, "/control", r#"{"relay1":"ON"}"#);
    assert_eq!(status, 405);
    assert_eq!(json, json!({"error": "Unauthorized method"}));
    assert_eq!(b.relays.writes.len(), boot_writes);
    assert_eq!(relays(&mut b), all_off());
}

#[test]
fn control_with_invalid_json_changes_nothing() {
    let mut b = board();
    let boot_writes = b.relays.writes.len();

    for body in ["", "not json", r#"{"relay1":"ON""#] {
        let (status, json) = call(&mut b, Method::Post, "/control", body);
        assert_eq!(status, 400, "body {:?}", body);
        assert_eq!(json, json!({"error": "Invalid JSON body"}));
    }
    assert_eq!(b.relays.writes.len(), boot_writes);
    assert_eq!(relays(&mut b), all_off());
    assert!(
        b.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::RequestRejected(ApiError::InvalidBody)))
    );
}

#[test]
fn oversized_body_is_rejected() {
    let mut b = board();
    let padding = "x".repeat(2048);
    let body = format!(r#"{{"relay1":"ON","pad":"{}"}}"#, padding);
    let (status, _) = call(&mut b, Method::Post, "/control", &body);
    assert_eq!(status, 400);
    assert_eq!(b.app.relay_state("relay1"), Some(RelayState::Off));
}

#[test]
fn unknown_relay_names_are_ignored() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/control", r#"{"relay9":"ON","pump":"ON"}"#);
    assert_eq!(status, 200);
    assert_eq!(json["relays"], all_off_json());
}

#[test]
fn unknown_relay_values_are_ignored() {
    let mut b = board();
    call(&mut b, Method::Post, "/control", r#"{"relay2":"ON"}"#);

    for value in [r#""TOGGLE""#, r#""on""#, "1", "true", "null"] {
        let body = format!(r#"{{"relay2":{}}}"#, value);
        let (status, json) = call(&mut b, Method::Post, "/control", &body);
        assert_eq!(status, 200, "value {}", value);
        assert_eq!(json["relays"][1], "ON", "value {}", value);
    }
}

#[test]
fn non_object_json_is_an_empty_update() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/control", r#"["relay1","ON"]"#);
    assert_eq!(status, 200);
    assert_eq!(json["relays"], all_off_json());
}

#[test]
fn repeating_a_control_body_is_idempotent() {
    let mut b = board();
    let body = r#"{"relay4":"ON","relay5":"ON","relay6":"OFF"}"#;
    let (_, first) = call(&mut b, Method::Post, "/control", body);
    let (_, second) = call(&mut b, Method::Post, "/control", body);
    assert_eq!(first, second);
}

#[test]
fn mixed_body_applies_only_valid_entries() {
    let mut b = board();
    let (status, json) = call(
        &mut b,
        Method::Post,
        "/control",
        r#"{"relay1":"ON","relay2":"TOGGLE","relay9":"ON"}"#,
    );
    assert_eq!(status, 200);
    assert_eq!(json["relays"][0], "ON");
    assert_eq!(json["relays"][1], "OFF");
}

// ── /hostname ─────────────────────────────────────────────────

#[test]
fn hostname_long_form_updates_infos_and_nvs() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/hostname", r#"{"hostname":"kitchen"}"#);
    assert_eq!(status, 200);
    assert_eq!(json["hostname"], "kitchen");

    let (_, infos) = call(&mut b, Method::Get, "/infos", "");
    assert_eq!(infos["hostname"], "kitchen");
    assert_eq!(b.storage.raw("hostname"), Some(&b"kitchen"[..]));
}

#[test]
fn hostname_short_form_is_accepted() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/hostname", r#"{"h":"garage"}"#);
    assert_eq!(status, 200);
    assert_eq!(json["hostname"], "garage");
}

#[test]
fn hostname_long_form_wins_over_short() {
    let mut b = board();
    let (_, json) = call(&mut b, Method::Post, "/hostname", r#"{"h":"short","hostname":"long"}"#);
    assert_eq!(json["hostname"], "long");
}

#[test]
fn invalid_hostname_is_rejected() {
    let mut b = board();
    for body in [
        r#"{"hostname":"has space"}"#,
        r#"{"hostname":""}"#,
        r#"{"hostname":42}"#,
        r#"{"h":"-dash"}"#,
    ] {
        let (status, json) = call(&mut b, Method::Post, "/hostname", body);
        assert_eq!(status, 400, "body {}", body);
        assert_eq!(json, json!({"error": "Invalid hostname"}));
    }
    let (_, infos) = call(&mut b, Method::Get, "/infos", "");
    assert_eq!(infos["hostname"], "espressif");
    assert!(b.storage.raw("hostname").is_none());
}

#[test]
fn hostname_body_without_name_changes_nothing() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/hostname", r#"{"name":"kitchen"}"#);
    assert_eq!(status, 200);
    assert_eq!(json["hostname"], "espressif");
}

#[test]
fn hostname_persist_failure_still_answers_ok() {
    let mut b = board();
    b.storage.fail_writes = true;
    let (status, json) = call(&mut b, Method::Post, "/hostname", r#"{"hostname":"kitchen"}"#);
    assert_eq!(status, 200);
    assert_eq!(json["hostname"], "kitchen");
}

#[test]
fn hostname_rejects_get() {
    let mut b = board();
    let (status, _) = call(&mut b, Method::Get, "/hostname", "");
    assert_eq!(status, 405);
}

// ── /default_state ────────────────────────────────────────────

#[test]
fn default_state_is_persisted_and_reported() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/default_state", r#"{"default_state":"on"}"#);
    assert_eq!(status, 200);
    assert_eq!(json["default_state"], "on");
    assert_eq!(b.storage.raw("default"), Some(&[1u8][..]));
    // Current relay states are not touched.
    assert_eq!(json["relays"], all_off_json());

    call(&mut b, Method::Post, "/default_state", r#"{"default_state":"off"}"#);
    assert_eq!(b.storage.raw("default"), Some(&[0u8][..]));
}

#[test]
fn invalid_default_state_is_rejected() {
    let mut b = board();
    let (status, json) = call(&mut b, Method::Post, "/default_state", r#"{"default_state":"ON!"}"#);
    assert_eq!(status, 400);
    assert_eq!(json, json!({"error": "Invalid JSON body"}));
    assert!(b.storage.raw("default").is_none());
}

#[test]
fn default_state_save_failure_is_reported_and_not_applied() {
    let mut b = board();
    b.storage.fail_writes = true;
    let (status, json) = call(&mut b, Method::Post, "/default_state", r#"{"default_state":"on"}"#);
    assert_eq!(status, 500);
    assert_eq!(json, json!({"error": "Storage unavailable"}));
    assert!(b.storage.raw("default").is_none());
    assert_eq!(b.app.default_state(), None);

    let (_, infos) = call(&mut b, Method::Get, "/infos", "");
    assert!(infos.get("default_state").is_none());
    assert!(
        b.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::RequestRejected(ApiError::StorageUnavailable)))
    );
}

// ── Routing ───────────────────────────────────────────────────

#[test]
fn unknown_path_is_not_found_for_any_method() {
    let mut b = board();
    let methods = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Options,
        Method::Other,
    ];
    for method in methods {
        for path in ["/unknown/path", "/", "/infos/", "/Control"] {
            let (status, json) = call(&mut b, method, path, "");
            assert_eq!(status, 404, "{:?} {}", method, path);
            assert_eq!(json, json!({"error": "Content not found"}));
        }
    }
}
