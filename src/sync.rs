//! Boot-time relay synchronisation from the peer state service.
//!
//! Runs once, before the HTTP server starts: a single GET to
//! `http://<peer-host>/states/<chip_id>`, bounded by the configured
//! timeout.  A JSON object in the `/control` body shape is applied with
//! the same resolve/apply path the API uses.  Every failure is logged and
//! swallowed and the board keeps its compiled-in or persisted state.

use core::fmt::Write;

use log::{info, warn};
use serde_json::Value;

use crate::app::commands::AppCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, NetworkPort, PeerPort, RelayPort, StoragePort};
use crate::app::service::AppService;
use crate::config::{BoardConfig, MAX_BODY_LEN};
use crate::error::SyncError;

pub type PeerUrl = heapless::String<128>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Snapshot applied; `n` relays written.
    Applied(usize),
    /// No peer configured.
    Skipped,
    Failed(SyncError),
}

pub fn peer_url(host: &str, chip_id: &str) -> Result<PeerUrl, SyncError> {
    let mut url = PeerUrl::new();
    write!(url, "http://{}/states/{}", host, chip_id).map_err(|_| SyncError::UrlTooLong)?;
    Ok(url)
}

/// Fetch and apply the peer snapshot.  Never retries.
pub fn sync_from_peer(
    config: &BoardConfig,
    peer: &mut impl PeerPort,
    app: &mut AppService,
    relays: &mut impl RelayPort,
    net: &mut impl NetworkPort,
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> SyncOutcome {
    let Some(host) = config.peer_host.as_deref() else {
        info!("Sync: no peer configured, keeping boot state");
        return SyncOutcome::Skipped;
    };

    match fetch(host, config.peer_timeout_ms, peer, app.chip_id()) {
        Ok(map) => {
            let update = app.bank().resolve(&map);
            let applied = update.changes.len();
            if let Err(e) = app.handle_command(AppCommand::SetRelays(update), relays, net, storage, sink) {
                warn!("Sync: {}", e);
            }
            sink.emit(&AppEvent::PeerSyncApplied { applied });
            SyncOutcome::Applied(applied)
        }
        Err(e) => {
            sink.emit(&AppEvent::PeerSyncFailed(e));
            SyncOutcome::Failed(e)
        }
    }
}

fn fetch(
    host: &str,
    timeout_ms: u32,
    peer: &mut impl PeerPort,
    chip_id: &str,
) -> Result<serde_json::Map<String, Value>, SyncError> {
    let url = peer_url(host, chip_id)?;
    info!("Sync: GET {} (timeout {} ms)", url, timeout_ms);

    let mut buf = [0u8; MAX_BODY_LEN];
    let len = peer.get(&url, timeout_ms, &mut buf)?;

    match serde_json::from_slice::<Value>(&buf[..len]) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(SyncError::Malformed),
    }
}
