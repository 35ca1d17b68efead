//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the boot-time sync
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::error::{ApiError, SyncError};
use crate::relay::{DefaultState, RelayState};

use super::ports::Hostname;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Outputs configured and driven to their initial level.
    Started { initial: RelayState },

    /// A relay output was written.
    RelaySwitched {
        name: &'static str,
        pin: i32,
        from: RelayState,
        to: RelayState,
    },

    /// Interface hostname changed.
    HostnameChanged(Hostname),

    /// Persisted power-up state changed.
    DefaultStateChanged(DefaultState),

    /// Boot-time peer snapshot was applied to `applied` relays.
    PeerSyncApplied { applied: usize },

    /// Boot-time peer fetch failed; state left as is.
    PeerSyncFailed(SyncError),

    /// A request was answered with an error status.
    RequestRejected(ApiError),
}
