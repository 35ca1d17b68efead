//! Output drivers.

pub mod relay_pins;
