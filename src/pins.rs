//! GPIO assignments for the relay board.
//!
//! Single source of truth: the relay bank and the pin driver both read
//! from here.  Slot order is the order relays are reported in `/infos`.
//!
//! The mapping follows the board wiring (relay module IN1..IN8).
//! GPIO 0, 2 and 15 are strapping pins: the relay module must not pull
//! them to a non-default level during reset.

/// Number of relay channels on the board.
pub const RELAY_COUNT: usize = 8;

/// Output GPIO for each relay, in slot order.
pub const RELAY_GPIOS: [i32; RELAY_COUNT] = [5, 4, 0, 2, 14, 12, 13, 15];

/// Stable logical name for each relay, in slot order.
pub const RELAY_NAMES: [&str; RELAY_COUNT] = [
    "relay1", "relay2", "relay3", "relay4", "relay5", "relay6", "relay7", "relay8",
];
