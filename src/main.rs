//! Rhapsody relay board firmware: main entry point.
//!
//! Hexagonal architecture: the pure core is driven by adapters wired up
//! here.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter    WifiAdapter    │
//! │  (RelayPort)       (EventSink)    (StoragePort) (NetworkPort)  │
//! │  HttpPeer          http_server                                 │
//! │  (PeerPort)        (EspHttpServer → Board::handle)             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │         Board: AppService · api router · portal        │    │
//! │  │                   RelayBank (8 slots)                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot: NVS → relay outputs at their power-up level → Wi-Fi (station or
//! configuration portal) → one peer sync → HTTP server → supervision loop.
#![deny(unused_must_use)]

use log::info;

use rhapsody_relays::adapters::device_id;
use rhapsody_relays::adapters::hardware::HardwareAdapter;
use rhapsody_relays::adapters::log_sink::LogEventSink;
use rhapsody_relays::adapters::nvs::NvsAdapter;
use rhapsody_relays::adapters::peer::HttpPeer;
use rhapsody_relays::adapters::wifi::WifiAdapter;
use rhapsody_relays::board::{Board, ServeMode};
use rhapsody_relays::config::BoardConfig;
use rhapsody_relays::drivers::relay_pins::RelayPins;
use rhapsody_relays::settings;

// ── Device ────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
    use log::{error, warn};

    use rhapsody_relays::adapters::http_server;
    use rhapsody_relays::pins::RELAY_GPIOS;

    fn restart(reason: &str) -> ! {
        error!("Restarting: {}", reason);
        FreeRtos::delay_ms(1000);
        esp_idf_hal::reset::restart()
    }

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("rhapsody-relays v{}", env!("CARGO_PKG_VERSION"));

    let config = BoardConfig::default();
    if let Err(msg) = config.validate() {
        anyhow::bail!("board config invalid: {}", msg);
    }

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    // ── 2. NVS ────────────────────────────────────────────────
    let partition = match EspDefaultNvsPartition::take() {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("NVS partition unavailable ({}), running without persistence", e);
            None
        }
    };
    let storage = NvsAdapter::new(partition.clone());

    // ── 3. Relay outputs ──────────────────────────────────────
    let pins = RelayPins::from_gpios(&RELAY_GPIOS)?;
    let hardware = HardwareAdapter::new(pins, config.active_low);

    // ── 4. Wi-Fi ──────────────────────────────────────────────
    let wifi = match EspWifi::new(peripherals.modem, sysloop.clone(), partition)
        .and_then(|w| BlockingWifi::wrap(w, sysloop))
    {
        Ok(w) => w,
        Err(e) => {
            error!("Wi-Fi driver init failed: {}", e);
            restart("no network interface")
        }
    };

    let chip_id = device_id::chip_id(&device_id::read_mac());
    info!("Chip id {}", chip_id);

    let mut board = Board::boot(
        config.clone(),
        chip_id,
        hardware,
        WifiAdapter::new(wifi),
        storage,
        LogEventSink::new(),
    );

    let creds = settings::load_credentials(&board.storage);
    let hostname = settings::load_hostname(&board.storage);
    match board.net.auto_connect(creds.as_ref(), hostname.as_deref(), &config.ap_ssid) {
        Ok(mode) => board.set_mode(mode),
        Err(e) => restart(&format!("Wi-Fi: {}", e)),
    }

    // ── 5. Peer sync ──────────────────────────────────────────
    let outcome = board.sync(&mut HttpPeer::new());
    info!("Peer sync: {:?}", outcome);

    // ── 6. HTTP server ────────────────────────────────────────
    let mode = board.mode();
    let board = Arc::new(Mutex::new(board));
    let _server = match http_server::start(board.clone(), config.http_port) {
        Ok(s) => s,
        Err(e) => restart(&format!("HTTP server: {}", e)),
    };

    // ── 7. Supervision loop ───────────────────────────────────
    let portal_deadline = Instant::now() + Duration::from_secs(u64::from(config.portal_timeout_secs));
    loop {
        FreeRtos::delay_ms(500);

        let restart_requested = board.lock().map(|b| b.restart_requested()).unwrap_or(true);
        if restart_requested {
            restart("new Wi-Fi credentials stored");
        }
        if mode == ServeMode::Portal && Instant::now() >= portal_deadline {
            restart("configuration portal timed out");
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
type SimBoard = Board<
    HardwareAdapter<rhapsody_relays::drivers::relay_pins::SimPin>,
    WifiAdapter,
    NvsAdapter,
    LogEventSink,
>;

/// One simulated power cycle over `storage`.
#[cfg(not(target_os = "espidf"))]
fn sim_boot(
    config: &BoardConfig,
    chip_id: &rhapsody_relays::app::service::ChipId,
    storage: NvsAdapter,
) -> anyhow::Result<SimBoard> {
    use rhapsody_relays::drivers::relay_pins::SimPin;

    let hardware = HardwareAdapter::new(
        RelayPins::new(core::array::from_fn(|_| SimPin::default())),
        config.active_low,
    );
    let mut board = Board::boot(
        config.clone(),
        chip_id.clone(),
        hardware,
        WifiAdapter::new(),
        storage,
        LogEventSink::new(),
    );
    let creds = settings::load_credentials(&board.storage);
    let hostname = settings::load_hostname(&board.storage);
    let mode = board
        .net
        .auto_connect(creds.as_ref(), hostname.as_deref(), &config.ap_ssid)?;
    board.set_mode(mode);
    Ok(board)
}

/// Host run: boots the board on simulated adapters, walks the portal
/// once, restarts into station mode and exercises the API.
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use rhapsody_relays::api::{Method, Request, Response};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("rhapsody-relays v{} (simulation)", env!("CARGO_PKG_VERSION"));

    let config = BoardConfig::default();
    config.validate().map_err(anyhow::Error::msg)?;

    let chip_id = device_id::chip_id(&device_id::read_mac());
    let show = |label: &str, resp: Response| info!("{} -> {} {}", label, resp.status, resp.body);

    // First boot: empty NVS, so the portal comes up.
    let mut board = sim_boot(&config, &chip_id, NvsAdapter::new())?;
    show("GET /", board.handle(&Request::new(Method::Get, "/", b"")));
    show(
        "POST /wifi",
        board.handle(&Request::new(
            Method::Post,
            "/wifi",
            br#"{"ssid":"HomeWiFi","password":"mysecret8"}"#,
        )),
    );
    if !board.restart_requested() {
        anyhow::bail!("portal did not request a restart");
    }

    // Second boot: credentials stored, station mode.
    let mut board = sim_boot(&config, &chip_id, board.storage)?;
    if board.mode() != ServeMode::Station {
        anyhow::bail!("station did not come up");
    }
    info!("Peer sync: {:?}", board.sync(&mut HttpPeer::new()));

    let requests: [(Method, &str, &[u8]); 6] = [
        (Method::Get, "/infos", b""),
        (Method::Post, "/control", br#"{"relay1":"ON","relay3":"ON","relay9":"ON"}"#),
        (Method::Get, "/control", b""),
        (Method::Post, "/hostname", br#"{"hostname":"kitchen"}"#),
        (Method::Post, "/default_state", br#"{"default_state":"on"}"#),
        (Method::Get, "/nope", b""),
    ];
    for (method, uri, body) in requests {
        show(&format!("{:?} {}", method, uri), board.handle(&Request::new(method, uri, body)));
    }

    Ok(())
}
