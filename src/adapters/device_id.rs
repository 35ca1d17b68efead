//! Device identity derived from the factory MAC address.
//!
//! The chip identifier is the low 24 bits of the 6-byte MAC, rendered as
//! lowercase hex without padding (`0x0a0b0c` → `"a0b0c"`).  It is:
//! - Deterministic across reboots (factory-burned eFuse MAC)
//! - Reported as `chip_id` in `/infos`
//! - The lookup key for the boot-time peer sync

use core::fmt::Write;

use crate::app::service::ChipId;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: `mac` is a valid 6-byte buffer, as the API requires.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

pub fn chip_id(mac: &MacAddress) -> ChipId {
    let raw = u32::from_be_bytes([0, mac[3], mac[4], mac[5]]);
    let mut id = ChipId::new();
    let _ = write!(id, "{:x}", raw);
    id
}
