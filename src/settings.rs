//! Persisted board settings.
//!
//! Thin typed layer over [`StoragePort`].  Every loader treats a missing or
//! unreadable value as "not set" and logs why. A corrupted NVS entry must
//! never stop the board from booting.
//!
//! | key        | encoding                         |
//! |------------|----------------------------------|
//! | `default`  | 1 byte, 0 = off / 1 = on         |
//! | `hostname` | raw UTF-8                        |
//! | `wifi`     | postcard [`WifiCredentials`]     |

use core::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{Hostname, StorageError, StoragePort};
use crate::relay::DefaultState;

/// NVS namespace holding every key below.
pub const NAMESPACE: &str = "relays";

const DEFAULT_STATE_KEY: &str = "default";
const HOSTNAME_KEY: &str = "hostname";
const WIFI_KEY: &str = "wifi";

/// Upper bound for the postcard credentials blob (32 + 64 + length prefixes).
const WIFI_BLOB_MAX: usize = 128;

// ───────────────────────────────────────────────────────────────
// Default state
// ───────────────────────────────────────────────────────────────

pub fn load_default_state(storage: &impl StoragePort) -> Option<DefaultState> {
    let mut buf = [0u8; 1];
    match storage.read(DEFAULT_STATE_KEY, &mut buf) {
        Ok(1) => {
            let state = DefaultState::from_byte(buf[0]);
            if state.is_none() {
                warn!("Settings: default state byte 0x{:02x} invalid, ignoring", buf[0]);
            }
            state
        }
        Ok(n) => {
            warn!("Settings: default state has {} bytes, ignoring", n);
            None
        }
        Err(StorageError::NotFound) => None,
        Err(e) => {
            warn!("Settings: default state read failed: {}", e);
            None
        }
    }
}

pub fn save_default_state(
    storage: &mut impl StoragePort,
    state: DefaultState,
) -> Result<(), StorageError> {
    storage.write(DEFAULT_STATE_KEY, &[state.to_byte()])?;
    info!("Settings: default state saved ({:?})", state);
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Hostname
// ───────────────────────────────────────────────────────────────

/// Returns `true` for an RFC 1123 label of at most 32 characters.
pub fn is_valid_hostname(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 32
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub fn load_hostname(storage: &impl StoragePort) -> Option<Hostname> {
    let mut buf = [0u8; 32];
    let len = match storage.read(HOSTNAME_KEY, &mut buf) {
        Ok(n) => n,
        Err(StorageError::NotFound) => return None,
        Err(e) => {
            warn!("Settings: hostname read failed: {}", e);
            return None;
        }
    };
    let name = core::str::from_utf8(&buf[..len]).ok().filter(|s| is_valid_hostname(s));
    match name {
        Some(s) => Hostname::try_from(s).ok(),
        None => {
            warn!("Settings: stored hostname invalid, ignoring");
            None
        }
    }
}

pub fn save_hostname(storage: &mut impl StoragePort, hostname: &str) -> Result<(), StorageError> {
    storage.write(HOSTNAME_KEY, hostname.as_bytes())?;
    info!("Settings: hostname saved ('{}')", hostname);
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Wi-Fi credentials
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
        }
    }
}

/// Station credentials entered through the configuration portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(CredentialsError::InvalidSsid);
        }
        if !password.is_empty() && (password.len() < 8 || password.len() > 64) {
            return Err(CredentialsError::InvalidPassword);
        }
        Ok(Self {
            ssid: heapless::String::try_from(ssid).map_err(|()| CredentialsError::InvalidSsid)?,
            password: heapless::String::try_from(password)
                .map_err(|()| CredentialsError::InvalidPassword)?,
        })
    }
}

pub fn load_credentials(storage: &impl StoragePort) -> Option<WifiCredentials> {
    let mut buf = [0u8; WIFI_BLOB_MAX];
    let len = match storage.read(WIFI_KEY, &mut buf) {
        Ok(n) => n,
        Err(StorageError::NotFound) => return None,
        Err(e) => {
            warn!("Settings: credentials read failed: {}", e);
            return None;
        }
    };
    match postcard::from_bytes::<WifiCredentials>(&buf[..len]) {
        Ok(creds) => Some(creds),
        Err(e) => {
            warn!("Settings: stored credentials corrupted ({}), ignoring", e);
            None
        }
    }
}

pub fn save_credentials(
    storage: &mut impl StoragePort,
    creds: &WifiCredentials,
) -> Result<(), StorageError> {
    let bytes = postcard::to_allocvec(creds).map_err(|_| StorageError::Corrupted)?;
    storage.write(WIFI_KEY, &bytes)?;
    info!("Settings: credentials saved (SSID='{}')", creds.ssid);
    Ok(())
}
