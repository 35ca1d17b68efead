//! Board status report: the body of every successful API response.

use core::fmt::Write;

use serde::Serialize;

use crate::app::ports::{Hostname, Ssid};
use crate::pins::RELAY_COUNT;
use crate::relay::{DefaultState, RelayState};

/// Dotted-quad IPv4 (`255.255.255.255` is 15 characters).
pub type IpString = heapless::String<15>;

/// Field order here is the field order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardStatus {
    pub ssid: Ssid,
    pub ip_address: IpString,
    pub hostname: Hostname,
    pub chip_id: heapless::String<8>,
    pub board_type: &'static str,
    pub relays: [RelayState; RELAY_COUNT],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_state: Option<DefaultState>,
}

impl BoardStatus {
    pub fn to_json(&self) -> String {
        // Every field is a plain string or array; serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub fn format_ip(ip: core::net::Ipv4Addr) -> IpString {
    let mut s = IpString::new();
    let _ = write!(s, "{}", ip);
    s
}
