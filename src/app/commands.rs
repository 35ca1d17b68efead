//! Inbound commands to the application service.
//!
//! The API handlers validate request bodies and turn them into these;
//! the boot-time sync produces `SetRelays` from the peer snapshot.  By
//! the time a command reaches [`AppService`](super::service::AppService)
//! it is already valid and cannot fail.

use crate::relay::{DefaultState, RelayUpdate};

use super::ports::Hostname;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Drive the named relays (already resolved against the bank).
    SetRelays(RelayUpdate),

    /// Apply and persist a new interface hostname.
    SetHostname(Hostname),

    /// Persist the power-up state.  Current outputs are untouched.
    SetDefaultState(DefaultState),
}
