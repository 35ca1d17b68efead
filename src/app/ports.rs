//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (relay outputs, network interface, NVS, peer HTTP
//! client, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) and the API router consume
//! them via generics, so the domain core never touches hardware directly.

use core::fmt;
use core::net::Ipv4Addr;

use crate::relay::RelayState;

/// Hostname as held by the network interface (ESP-IDF caps it at 32).
pub type Hostname = heapless::String<32>;

/// Wi-Fi SSID (802.11 caps it at 32 bytes).
pub type Ssid = heapless::String<32>;

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the relay outputs.
///
/// Writes are not fallible in the relay model: adapters log a failed pin
/// write and carry on, the logical state has already changed.
pub trait RelayPort {
    /// Drive slot `index` (wired to `pin`) to `state`.
    fn drive(&mut self, index: usize, pin: i32, state: RelayState);
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain ↔ station interface)
// ───────────────────────────────────────────────────────────────

/// Identity of the network interface the API is served on.
pub trait NetworkPort {
    /// SSID of the network we are attached to (or the portal AP name).
    fn ssid(&self) -> Ssid;

    /// Current IPv4 address, `0.0.0.0` when none is assigned.
    fn ip_address(&self) -> Ipv4Addr;

    /// Hostname currently set on the interface.
    fn hostname(&self) -> Hostname;

    /// Set the interface hostname.  Takes effect on the next DHCP lease.
    fn set_hostname(&mut self, hostname: &str) -> Result<(), NetworkError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage for the board settings.
///
/// All keys live in one namespace.  Write operations MUST be atomic; no
/// partial writes on power loss.  ESP-IDF NVS guarantees this natively.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Peer port (driven adapter: domain → remote state service)
// ───────────────────────────────────────────────────────────────

/// One-shot HTTP GET against the peer state service.
pub trait PeerPort {
    /// Fetch `url` into `buf` and return the body length.
    ///
    /// Implementations make a single attempt bounded by `timeout_ms` and
    /// never retry.  A non-2xx status is reported as [`PeerError::Status`].
    fn get(&mut self, url: &str, timeout_ms: u32, buf: &mut [u8]) -> Result<usize, PeerError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Stored value does not fit the caller's buffer or format.
    Corrupted,
    /// Generic I/O error.
    IoError,
}

/// Errors from [`NetworkPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// The interface rejected the hostname.
    HostnameRejected,
    /// The interface is not up.
    NotReady,
}

/// Errors from [`PeerPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerError {
    /// Connection could not be opened or broke mid-transfer.
    Transport,
    /// No response within the timeout.
    Timeout,
    /// Peer answered with a non-2xx status.
    Status(u16),
    /// Response body exceeds the receive buffer.
    BodyTooLarge,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::Corrupted => write!(f, "stored value corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostnameRejected => write!(f, "hostname rejected by interface"),
            Self::NotReady => write!(f, "network interface not ready"),
        }
    }
}

impl fmt::Display for PeerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport error"),
            Self::Timeout => write!(f, "timed out"),
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::BodyTooLarge => write!(f, "response body too large"),
        }
    }
}
