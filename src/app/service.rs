//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the [`RelayBank`] and the board identity.  It
//! exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!   RelayPort ◀──┌────────────────────────┐──▶ EventSink
//!                │       AppService       │
//! NetworkPort ◀─▶│  RelayBank · identity  │◀─▶ StoragePort
//!                └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{BOARD_TYPE, BoardConfig};
use crate::relay::{DefaultState, RelayBank, RelayState};
use crate::settings;
use crate::status::{BoardStatus, format_ip};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, NetworkPort, RelayPort, StorageError, StoragePort};

/// Chip identifier: lowercase hex, no padding.
pub type ChipId = heapless::String<8>;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service owns the relay state and answers commands.
pub struct AppService {
    bank: RelayBank,
    chip_id: ChipId,
    default_state: Option<DefaultState>,
    report_default_state: bool,
}

impl AppService {
    /// Construct the service.  The power-up state is the persisted
    /// `default_state` if there is one, otherwise `config.initial_state`.
    ///
    /// Does **not** touch the outputs; call [`start`](Self::start) next.
    pub fn new(config: &BoardConfig, chip_id: ChipId, default_state: Option<DefaultState>) -> Self {
        let initial = default_state.map_or(config.initial_state, DefaultState::relay_state);
        Self {
            bank: RelayBank::new(initial),
            chip_id,
            default_state,
            report_default_state: config.report_default_state,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its initial level.
    pub fn start(&mut self, relays: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.bank.drive_all(relays);
        let initial = self.bank.slots()[0].state;
        sink.emit(&AppEvent::Started { initial });
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a validated command.
    ///
    /// Relay and hostname changes always take effect; a hostname that
    /// cannot be persisted is logged.  The default state only exists as a
    /// stored value, so a failed save leaves it unchanged and is returned.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        relays: &mut impl RelayPort,
        net: &mut impl NetworkPort,
        storage: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> Result<(), StorageError> {
        match cmd {
            AppCommand::SetRelays(update) => {
                let written = self.bank.apply(&update, relays, sink);
                if update.unknown_keys > 0 || update.rejected_values > 0 {
                    info!(
                        "Control: {} written, {} unknown keys, {} rejected values",
                        written, update.unknown_keys, update.rejected_values
                    );
                }
            }
            AppCommand::SetHostname(hostname) => {
                if let Err(e) = net.set_hostname(&hostname) {
                    warn!("Hostname: interface refused '{}': {}", hostname, e);
                }
                if let Err(e) = settings::save_hostname(storage, &hostname) {
                    warn!("Hostname: persist failed: {}", e);
                }
                sink.emit(&AppEvent::HostnameChanged(hostname));
            }
            AppCommand::SetDefaultState(state) => {
                settings::save_default_state(storage, state).inspect_err(|e| {
                    warn!("Default state: persist failed, keeping {:?}: {}", self.default_state, e);
                })?;
                self.default_state = Some(state);
                sink.emit(&AppEvent::DefaultStateChanged(state));
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build the status report.
    pub fn status(&self, net: &impl NetworkPort) -> BoardStatus {
        BoardStatus {
            ssid: net.ssid(),
            ip_address: format_ip(net.ip_address()),
            hostname: net.hostname(),
            chip_id: self.chip_id.clone(),
            board_type: BOARD_TYPE,
            relays: self.bank.states(),
            default_state: if self.report_default_state {
                self.default_state
            } else {
                None
            },
        }
    }

    pub fn bank(&self) -> &RelayBank {
        &self.bank
    }

    pub fn relay_state(&self, name: &str) -> Option<RelayState> {
        self.bank.state(name)
    }

    pub fn chip_id(&self) -> &str {
        &self.chip_id
    }

    pub fn default_state(&self) -> Option<DefaultState> {
        self.default_state
    }
}
