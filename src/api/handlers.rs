//! Request handlers for the relay API.
//!
//! Each handler validates its body, turns it into an
//! [`AppCommand`](crate::app::commands::AppCommand) and hands it to the
//! service.  Method checks happen earlier, in route resolution.  On
//! success the router renders the status report.

use serde_json::{Map, Value};

use crate::app::commands::AppCommand;
use crate::app::ports::{EventSink, Hostname, NetworkPort, RelayPort, StoragePort};
use crate::app::service::AppService;
use crate::config::MAX_BODY_LEN;
use crate::error::ApiError;
use crate::relay::DefaultState;
use crate::settings::is_valid_hostname;

/// Parse a request body into a JSON object.
///
/// Anything that is not valid JSON (empty bodies included) or exceeds
/// [`MAX_BODY_LEN`] is `InvalidBody`.  Valid JSON that is not an object
/// names no keys, so it yields an empty map.
pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.len() > MAX_BODY_LEN {
        return Err(ApiError::InvalidBody);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(_) => Err(ApiError::InvalidBody),
    }
}

/// `POST /control`
pub fn control(
    body: &[u8],
    app: &mut AppService,
    relays: &mut impl RelayPort,
    net: &mut impl NetworkPort,
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> Result<(), ApiError> {
    let map = parse_object(body)?;
    let update = app.bank().resolve(&map);
    app.handle_command(AppCommand::SetRelays(update), relays, net, storage, sink)
        .map_err(|_| ApiError::StorageUnavailable)
}

/// `POST /hostname`: `{"hostname": ...}` or the short form `{"h": ...}`.
pub fn hostname(
    body: &[u8],
    app: &mut AppService,
    relays: &mut impl RelayPort,
    net: &mut impl NetworkPort,
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> Result<(), ApiError> {
    let map = parse_object(body)?;
    let Some(value) = map.get("hostname").or_else(|| map.get("h")) else {
        return Ok(());
    };
    let name = value
        .as_str()
        .filter(|s| is_valid_hostname(s))
        .and_then(|s| Hostname::try_from(s).ok())
        .ok_or(ApiError::InvalidHostname)?;
    app.handle_command(AppCommand::SetHostname(name), relays, net, storage, sink)
        .map_err(|_| ApiError::StorageUnavailable)
}

/// `POST /default_state`: `{"default_state": "on" | "off"}`.
///
/// The value is only reported once it is stored; a failed save is
/// `StorageUnavailable`.
pub fn default_state(
    body: &[u8],
    app: &mut AppService,
    relays: &mut impl RelayPort,
    net: &mut impl NetworkPort,
    storage: &mut impl StoragePort,
    sink: &mut impl EventSink,
) -> Result<(), ApiError> {
    let map = parse_object(body)?;
    let Some(value) = map.get("default_state") else {
        return Ok(());
    };
    let state = value
        .as_str()
        .and_then(DefaultState::parse)
        .ok_or(ApiError::InvalidBody)?;
    app.handle_command(AppCommand::SetDefaultState(state), relays, net, storage, sink)
        .map_err(|_| ApiError::StorageUnavailable)
}
