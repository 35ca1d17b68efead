//! The assembled board: application service plus the adapters it drives.
//!
//! `main` builds one [`Board`] and hands it to the HTTP server adapter,
//! which calls [`Board::handle`] for every request.  Generic over the
//! port implementations so the whole boot/serve path runs against mocks.

use log::info;

use crate::api::portal::{self, PortalOutcome};
use crate::api::{self, Request, Response};
use crate::app::ports::{EventSink, NetworkPort, PeerPort, RelayPort, StoragePort};
use crate::app::service::{AppService, ChipId};
use crate::config::BoardConfig;
use crate::settings;
use crate::sync::{self, SyncOutcome};

/// Which router answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    /// Joined a network: relay API.
    Station,
    /// Running the configuration access point: portal only.
    Portal,
}

pub struct Board<R, N, S, E> {
    pub app: AppService,
    pub relays: R,
    pub net: N,
    pub storage: S,
    pub sink: E,
    config: BoardConfig,
    mode: ServeMode,
    restart_requested: bool,
}

impl<R, N, S, E> Board<R, N, S, E>
where
    R: RelayPort,
    N: NetworkPort,
    S: StoragePort,
    E: EventSink,
{
    /// Build the service from persisted settings and drive the outputs
    /// to their power-up level.  Starts in [`ServeMode::Station`].
    pub fn boot(
        config: BoardConfig,
        chip_id: ChipId,
        mut relays: R,
        net: N,
        storage: S,
        mut sink: E,
    ) -> Self {
        let default_state = settings::load_default_state(&storage);
        let mut app = AppService::new(&config, chip_id, default_state);
        app.start(&mut relays, &mut sink);

        Self {
            app,
            relays,
            net,
            storage,
            sink,
            config,
            mode: ServeMode::Station,
            restart_requested: false,
        }
    }

    pub fn set_mode(&mut self, mode: ServeMode) {
        info!("Board: serving {:?}", mode);
        self.mode = mode;
    }

    pub fn mode(&self) -> ServeMode {
        self.mode
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Boot-time peer sync.  Only meaningful in station mode; skipped in
    /// the portal since there is no route to the peer.
    pub fn sync(&mut self, peer: &mut impl PeerPort) -> SyncOutcome {
        if self.mode != ServeMode::Station {
            return SyncOutcome::Skipped;
        }
        sync::sync_from_peer(
            &self.config,
            peer,
            &mut self.app,
            &mut self.relays,
            &mut self.net,
            &mut self.storage,
            &mut self.sink,
        )
    }

    /// Answer one request with the router for the current mode.
    pub fn handle(&mut self, req: &Request<'_>) -> Response {
        match self.mode {
            ServeMode::Station => api::dispatch(
                req,
                &mut self.app,
                &mut self.relays,
                &mut self.net,
                &mut self.storage,
                &mut self.sink,
            ),
            ServeMode::Portal => {
                let (resp, outcome) =
                    portal::dispatch(req, &self.config.ap_ssid, self.app.chip_id(), &mut self.storage);
                if outcome == PortalOutcome::Restart {
                    self.restart_requested = true;
                }
                resp
            }
        }
    }

    /// Set once the portal has stored credentials.
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }
}
