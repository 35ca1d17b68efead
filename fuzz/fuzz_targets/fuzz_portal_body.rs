//! Fuzz target: `api::portal::dispatch` with `POST /wifi`
//!
//! Arbitrary bytes as a credentials body: no panic, and a restart is only
//! requested when the stored blob decodes back to valid credentials.
//!
//! cargo fuzz run fuzz_portal_body

#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use rhapsody_relays::api::portal::{self, PortalOutcome};
use rhapsody_relays::api::{Method, Request};
use rhapsody_relays::app::ports::{StorageError, StoragePort};
use rhapsody_relays::settings;

#[derive(Default)]
struct Mem(HashMap<String, Vec<u8>>);

impl StoragePort for Mem {
    fn read(&self, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let v = self.0.get(key).ok_or(StorageError::NotFound)?;
        if v.len() > buf.len() {
            return Err(StorageError::Corrupted);
        }
        buf[..v.len()].copy_from_slice(v);
        Ok(v.len())
    }
    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.0.insert(key.to_string(), data.to_vec());
        Ok(())
    }
    fn exists(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut store = Mem::default();
    let (resp, outcome) = portal::dispatch(
        &Request::new(Method::Post, "/wifi", data),
        "rhapsody_relays_AP",
        "a1b2c3",
        &mut store,
    );

    match outcome {
        PortalOutcome::Restart => {
            assert_eq!(resp.status, 200);
            assert!(settings::load_credentials(&store).is_some());
        }
        PortalOutcome::Continue => assert!(!store.exists("wifi")),
    }
});
