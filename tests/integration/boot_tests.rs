//! Integration tests for the power-up path: persisted settings in,
//! driven outputs out.

use rhapsody_relays::app::events::AppEvent;
use rhapsody_relays::app::ports::StoragePort;
use rhapsody_relays::config::BoardConfig;
use rhapsody_relays::pins::RELAY_GPIOS;
use rhapsody_relays::relay::{DefaultState, RelayState};
use rhapsody_relays::settings;

use crate::mock_hw::{MockNvs, board, board_with};

#[test]
fn boot_drives_every_output_in_slot_order() {
    let b = board();
    assert_eq!(b.relays.writes.len(), 8);
    for (i, w) in b.relays.writes.iter().enumerate() {
        assert_eq!(w.index, i);
        assert_eq!(w.pin, RELAY_GPIOS[i]);
        assert_eq!(w.state, RelayState::Off);
    }
    assert!(matches!(
        b.sink.events.first(),
        Some(AppEvent::Started { initial: RelayState::Off })
    ));
}

#[test]
fn persisted_default_on_powers_relays_on() {
    let mut nvs = MockNvs::new();
    settings::save_default_state(&mut nvs, DefaultState::On).unwrap();

    let b = board_with(BoardConfig::default(), nvs);
    assert!(b.relays.writes.iter().all(|w| w.state == RelayState::On));
    assert!(b.app.bank().states().iter().all(|s| *s == RelayState::On));
    assert_eq!(b.app.default_state(), Some(DefaultState::On));
}

#[test]
fn persisted_default_off_overrides_config() {
    let mut nvs = MockNvs::new();
    settings::save_default_state(&mut nvs, DefaultState::Off).unwrap();
    let config = BoardConfig {
        initial_state: RelayState::On,
        ..BoardConfig::default()
    };

    let b = board_with(config, nvs);
    assert!(b.app.bank().states().iter().all(|s| *s == RelayState::Off));
}

#[test]
fn config_initial_state_applies_without_persisted_default() {
    let config = BoardConfig {
        initial_state: RelayState::On,
        ..BoardConfig::default()
    };
    let b = board_with(config, MockNvs::new());
    assert!(b.relays.writes.iter().all(|w| w.state == RelayState::On));
    assert_eq!(b.app.default_state(), None);
}

#[test]
fn corrupted_default_byte_falls_back_to_off() {
    let mut nvs = MockNvs::new();
    nvs.write("default", &[0x7F]).unwrap();

    let b = board_with(BoardConfig::default(), nvs);
    assert!(b.app.bank().states().iter().all(|s| *s == RelayState::Off));
    assert_eq!(b.app.default_state(), None);
}

#[test]
fn default_state_set_over_api_survives_reboot() {
    use rhapsody_relays::api::{Method, Request};

    let mut b = board();
    let resp = b.handle(&Request::new(
        Method::Post,
        "/default_state",
        br#"{"default_state":"on"}"#,
    ));
    assert_eq!(resp.status, 200);

    let rebooted = board_with(BoardConfig::default(), b.storage);
    assert!(rebooted.app.bank().states().iter().all(|s| *s == RelayState::On));
}

#[test]
fn unsaved_default_state_does_not_survive_reboot() {
    use rhapsody_relays::api::{Method, Request};

    let mut b = board();
    b.storage.fail_writes = true;
    let resp = b.handle(&Request::new(
        Method::Post,
        "/default_state",
        br#"{"default_state":"on"}"#,
    ));
    assert_eq!(resp.status, 500);

    let mut storage = b.storage;
    storage.fail_writes = false;
    let rebooted = board_with(BoardConfig::default(), storage);
    assert_eq!(rebooted.app.default_state(), None);
    assert_eq!(rebooted.app.relay_state("relay1"), Some(RelayState::Off));
}
