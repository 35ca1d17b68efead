//! Application core. Pure domain logic, no I/O.
//!
//! This module contains the rules for the relay board: the relay bank,
//! the command handling that mutates it, and the status report.  All
//! interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
