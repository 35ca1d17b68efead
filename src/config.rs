//! Board configuration parameters
//!
//! Compiled-in settings for the relay board.  User-changeable values
//! (hostname, default state, Wi-Fi credentials) live in NVS instead, see
//! [`crate::settings`].

use serde::{Deserialize, Serialize};

use crate::relay::RelayState;

/// Fixed board-type tag reported in `/infos`.
pub const BOARD_TYPE: &str = "rhapsody_relays";

/// Largest request or peer body accepted, in bytes.
pub const MAX_BODY_LEN: usize = 1024;

/// Core board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    // --- Network ---
    /// SSID of the configuration access point opened when no station
    /// credentials work.
    pub ap_ssid: heapless::String<32>,
    /// HTTP API port
    pub http_port: u16,
    /// Seconds the configuration portal waits for credentials before
    /// restarting the board.
    pub portal_timeout_secs: u32,

    // --- Peer sync ---
    /// Host (and optional `:port`) of the peer state service.  `None`
    /// disables the boot-time fetch.
    pub peer_host: Option<heapless::String<64>>,
    /// Upper bound for the single boot-time peer request (milliseconds)
    pub peer_timeout_ms: u32,

    // --- Relays ---
    /// State every relay powers up in when no default state is stored
    pub initial_state: RelayState,
    /// Relay module triggers on a LOW input
    pub active_low: bool,
    /// Include `default_state` in the status report
    pub report_default_state: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            // Network
            ap_ssid: heapless::String::try_from("rhapsody_relays_AP").unwrap_or_default(),
            http_port: 80,
            portal_timeout_secs: 180,

            // Peer sync
            peer_host: option_env!("RELAYS_PEER_HOST")
                .and_then(|h| heapless::String::try_from(h).ok()),
            peer_timeout_ms: 5_000,

            // Relays
            initial_state: RelayState::Off,
            active_low: false,
            report_default_state: true,
        }
    }
}

impl BoardConfig {
    /// Range-check the configuration.  The message names the offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.ap_ssid.is_empty() {
            return Err("ap_ssid must not be empty");
        }
        if self.http_port == 0 {
            return Err("http_port must be non-zero");
        }
        if !(100..=30_000).contains(&self.peer_timeout_ms) {
            return Err("peer_timeout_ms must be 100–30000");
        }
        if !(30..=3600).contains(&self.portal_timeout_secs) {
            return Err("portal_timeout_secs must be 30–3600");
        }
        if self.peer_host.as_ref().is_some_and(|h| h.is_empty()) {
            return Err("peer_host must not be empty when set");
        }
        Ok(())
    }
}
