//! Mock adapters for integration tests.
//!
//! Records every relay write and peer request so tests can assert on the
//! full history without touching real GPIO or the network.

use core::net::Ipv4Addr;
use std::collections::HashMap;

use rhapsody_relays::app::events::AppEvent;
use rhapsody_relays::app::ports::{
    EventSink, Hostname, NetworkError, NetworkPort, PeerError, PeerPort, RelayPort, Ssid,
    StorageError, StoragePort,
};
use rhapsody_relays::app::service::ChipId;
use rhapsody_relays::board::Board;
use rhapsody_relays::config::BoardConfig;
use rhapsody_relays::relay::RelayState;

// ── Relay write record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayWrite {
    pub index: usize,
    pub pin: i32,
    pub state: RelayState,
}

// ── MockRelays ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRelays {
    pub writes: Vec<RelayWrite>,
}

#[allow(dead_code)]
impl MockRelays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level written to output `index`, if any.
    pub fn level(&self, index: usize) -> Option<RelayState> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.index == index)
            .map(|w| w.state)
    }
}

impl RelayPort for MockRelays {
    fn drive(&mut self, index: usize, pin: i32, state: RelayState) {
        self.writes.push(RelayWrite { index, pin, state });
    }
}

// ── MockNetwork ───────────────────────────────────────────────

pub struct MockNetwork {
    pub ssid: Ssid,
    pub ip: Ipv4Addr,
    pub hostname: Hostname,
    pub reject_hostname: bool,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self {
            ssid: Ssid::try_from("HomeNet").unwrap(),
            ip: Ipv4Addr::new(192, 168, 1, 42),
            hostname: Hostname::try_from("espressif").unwrap(),
            reject_hostname: false,
        }
    }
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkPort for MockNetwork {
    fn ssid(&self) -> Ssid {
        self.ssid.clone()
    }

    fn ip_address(&self) -> Ipv4Addr {
        self.ip
    }

    fn hostname(&self) -> Hostname {
        self.hostname.clone()
    }

    fn set_hostname(&mut self, hostname: &str) -> Result<(), NetworkError> {
        if self.reject_hostname {
            return Err(NetworkError::HostnameRejected);
        }
        self.hostname = Hostname::try_from(hostname).map_err(|()| NetworkError::HostnameRejected)?;
        Ok(())
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.store.get(key).map(Vec::as_slice)
    }
}

impl StoragePort for MockNvs {
    fn read(&self, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let v = self.store.get(key).ok_or(StorageError::NotFound)?;
        if v.len() > buf.len() {
            return Err(StorageError::Corrupted);
        }
        buf[..v.len()].copy_from_slice(v);
        Ok(v.len())
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.store.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }
}

// ── MockPeer ──────────────────────────────────────────────────

pub struct MockPeer {
    pub response: Result<String, PeerError>,
    pub requests: Vec<(String, u32)>,
}

#[allow(dead_code)]
impl MockPeer {
    pub fn answering(body: &str) -> Self {
        Self {
            response: Ok(body.to_string()),
            requests: Vec::new(),
        }
    }

    pub fn failing(e: PeerError) -> Self {
        Self {
            response: Err(e),
            requests: Vec::new(),
        }
    }
}

impl PeerPort for MockPeer {
    fn get(&mut self, url: &str, timeout_ms: u32, buf: &mut [u8]) -> Result<usize, PeerError> {
        self.requests.push((url.to_string(), timeout_ms));
        let body = self.response.as_ref().map_err(|e| *e)?;
        if body.len() > buf.len() {
            return Err(PeerError::BodyTooLarge);
        }
        buf[..body.len()].copy_from_slice(body.as_bytes());
        Ok(body.len())
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Board fixture ─────────────────────────────────────────────

pub type TestBoard = Board<MockRelays, MockNetwork, MockNvs, LogSink>;

pub fn chip_id() -> ChipId {
    ChipId::try_from("a1b2c3").unwrap()
}

#[allow(dead_code)]
pub fn board_with(config: BoardConfig, storage: MockNvs) -> TestBoard {
    Board::boot(
        config,
        chip_id(),
        MockRelays::new(),
        MockNetwork::new(),
        storage,
        LogSink::default(),
    )
}

#[allow(dead_code)]
pub fn board() -> TestBoard {
    let config = BoardConfig {
        peer_host: None,
        ..BoardConfig::default()
    };
    board_with(config, MockNvs::new())
}
