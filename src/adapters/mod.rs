//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                   |
//! |---------------|--------------|-------------------------------|
//! | `device_id`   | —            | eFuse factory MAC             |
//! | `hardware`    | RelayPort    | GPIO relay outputs            |
//! | `http_server` | —            | ESP-IDF httpd (espidf only)   |
//! | `log_sink`    | EventSink    | Serial log output             |
//! | `nvs`         | StoragePort  | NVS / in-memory store         |
//! | `peer`        | PeerPort     | ESP-IDF HTTP client           |
//! | `wifi`        | NetworkPort  | ESP-IDF Wi-Fi STA / AP        |

pub mod device_id;
pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http_server;
pub mod log_sink;
pub mod nvs;
pub mod peer;
pub mod wifi;
