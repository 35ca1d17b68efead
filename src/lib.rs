//! Rhapsody relay board firmware library.
//!
//! Eight relays behind a small HTTP/JSON API.  Everything except the
//! adapters runs on the host; ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod api;
pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod pins;
pub mod relay;
pub mod settings;
pub mod status;
pub mod sync;

pub mod adapters;
pub mod drivers;
