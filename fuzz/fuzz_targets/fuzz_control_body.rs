//! Fuzz target: `api::dispatch` with `POST /control`
//!
//! Feeds arbitrary bytes as a control body and asserts the router never
//! panics, answers 200 or 400 only, and leaves the state untouched on 400.
//!
//! cargo fuzz run fuzz_control_body

#![no_main]

use libfuzzer_sys::fuzz_target;
use rhapsody_relays::api::{self, Method, Request};
use rhapsody_relays::app::events::AppEvent;
use rhapsody_relays::app::ports::{
    EventSink, Hostname, NetworkError, NetworkPort, RelayPort, Ssid, StorageError, StoragePort,
};
use rhapsody_relays::app::service::{AppService, ChipId};
use rhapsody_relays::config::BoardConfig;
use rhapsody_relays::relay::RelayState;

struct Null;

impl RelayPort for Null {
    fn drive(&mut self, _index: usize, _pin: i32, _state: RelayState) {}
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

impl NetworkPort for Null {
    fn ssid(&self) -> Ssid {
        Ssid::new()
    }
    fn ip_address(&self) -> core::net::Ipv4Addr {
        core::net::Ipv4Addr::UNSPECIFIED
    }
    fn hostname(&self) -> Hostname {
        Hostname::new()
    }
    fn set_hostname(&mut self, _hostname: &str) -> Result<(), NetworkError> {
        Ok(())
    }
}

impl StoragePort for Null {
    fn read(&self, _key: &str, _buf: &mut [u8]) -> Result<usize, StorageError> {
        Err(StorageError::NotFound)
    }
    fn write(&mut self, _key: &str, _data: &[u8]) -> Result<(), StorageError> {
        Ok(())
    }
    fn exists(&self, _key: &str) -> bool {
        false
    }
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new(&BoardConfig::default(), ChipId::new(), None);
    let before = app.bank().states();

    let resp = api::dispatch(
        &Request::new(Method::Post, "/control", data),
        &mut app,
        &mut Null,
        &mut Null,
        &mut Null,
        &mut Null,
    );

    assert!(resp.status == 200 || resp.status == 400, "status {}", resp.status);
    if resp.status == 400 {
        assert_eq!(app.bank().states(), before, "rejected body changed state");
    }
});
