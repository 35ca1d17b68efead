//! Configuration portal served on the board's own access point.
//!
//! Only reachable when the station connection could not be brought up.
//! The portal stores Wi-Fi credentials and asks for a restart; the relay
//! API is not served in this mode.

use log::{info, warn};
use serde_json::{Value, json};

use crate::app::ports::StoragePort;
use crate::error::ApiError;
use crate::settings::{self, WifiCredentials};

use super::handlers::parse_object;
use super::{Method, Request, Response};

/// What the board should do after answering a portal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalOutcome {
    Continue,
    /// Credentials were stored; restart to join the network.
    Restart,
}

/// Route and handle one portal request.
pub fn dispatch(
    req: &Request<'_>,
    ap_ssid: &str,
    chip_id: &str,
    storage: &mut impl StoragePort,
) -> (Response, PortalOutcome) {
    let result = match (req.path(), req.method) {
        ("/", Method::Get) => Ok((
            json!({ "ap": ap_ssid, "chip_id": chip_id }).to_string(),
            PortalOutcome::Continue,
        )),
        ("/wifi", Method::Post) => save_wifi(req.body, storage),
        ("/" | "/wifi", _) => Err(ApiError::MethodNotAllowed),
        _ => Err(ApiError::RouteNotFound),
    };

    match result {
        Ok((body, outcome)) => (Response::ok(body), outcome),
        Err(e) => {
            warn!("Portal: {:?} {} rejected: {}", req.method, req.path(), e);
            (Response::error(e), PortalOutcome::Continue)
        }
    }
}

fn save_wifi(
    body: &[u8],
    storage: &mut impl StoragePort,
) -> Result<(String, PortalOutcome), ApiError> {
    let map = parse_object(body)?;
    let ssid = map.get("ssid").and_then(Value::as_str).ok_or(ApiError::InvalidBody)?;
    let password = map.get("password").and_then(Value::as_str).unwrap_or("");

    let creds = WifiCredentials::new(ssid, password).map_err(|e| {
        warn!("Portal: {}", e);
        ApiError::InvalidBody
    })?;

    if let Err(e) = settings::save_credentials(storage, &creds) {
        warn!("Portal: could not store credentials: {}", e);
        return Ok((json!({ "saved": false }).to_string(), PortalOutcome::Continue));
    }
    info!("Portal: credentials for '{}' stored, restart requested", creds.ssid);
    Ok((json!({ "saved": true }).to_string(), PortalOutcome::Restart))
}
