//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production, stderr in simulation).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::ApiError;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { initial } => {
                info!("START | relays={}", initial);
            }
            AppEvent::RelaySwitched { name, pin, from, to } => {
                info!("RELAY | {} gpio={} | {} -> {}", name, pin, from, to);
            }
            AppEvent::HostnameChanged(name) => {
                info!("HOST  | hostname={}", name);
            }
            AppEvent::DefaultStateChanged(state) => {
                info!("HOST  | default_state={:?}", state);
            }
            AppEvent::PeerSyncApplied { applied } => {
                info!("SYNC  | applied={}", applied);
            }
            AppEvent::PeerSyncFailed(e) => {
                warn!("SYNC  | failed: {}, keeping boot state", e);
            }
            AppEvent::RequestRejected(ApiError::RouteNotFound) => {
                info!("HTTP  | 404 route not found");
            }
            AppEvent::RequestRejected(e) => {
                warn!("HTTP  | {} {}", e.status(), e);
            }
        }
    }
}
