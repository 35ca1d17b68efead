//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`] over the board's settings namespace
//! ([`settings::NAMESPACE`](crate::settings::NAMESPACE)).
//!
//! - ESP-IDF: `EspNvs` on the default partition.  Each `set_raw` is
//!   committed by the driver, so writes are atomic per key.
//! - Host: an in-memory map (dev/test only).
//!
//! A value larger than the caller's buffer is reported as
//! [`StorageError::Corrupted`] on both backends.

use log::info;

use crate::app::ports::{StorageError, StoragePort};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

#[cfg(target_os = "espidf")]
use log::warn;

pub struct NvsAdapter {
    /// `None` when the namespace could not be opened; every read then
    /// fails and the board runs on compiled-in defaults.
    #[cfg(target_os = "espidf")]
    nvs: Option<EspNvs<NvsDefault>>,
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

#[cfg(target_os = "espidf")]
impl NvsAdapter {
    /// Open the settings namespace read-write.
    ///
    /// The partition handle is shared with the Wi-Fi driver, which keeps
    /// its own calibration data in NVS.
    pub fn new(partition: Option<EspDefaultNvsPartition>) -> Self {
        let Some(partition) = partition else {
            warn!("NvsAdapter: no NVS partition, settings will not persist");
            return Self { nvs: None };
        };
        match EspNvs::new(partition, crate::settings::NAMESPACE, true) {
            Ok(nvs) => {
                info!("NvsAdapter: namespace '{}' open", crate::settings::NAMESPACE);
                Self { nvs: Some(nvs) }
            }
            Err(e) => {
                warn!("NvsAdapter: open '{}' failed ({}), settings will not persist",
                    crate::settings::NAMESPACE, e);
                Self { nvs: None }
            }
        }
    }

    fn handle(&self) -> Result<&EspNvs<NvsDefault>, StorageError> {
        self.nvs.as_ref().ok_or(StorageError::IoError)
    }

    fn handle_mut(&mut self) -> Result<&mut EspNvs<NvsDefault>, StorageError> {
        self.nvs.as_mut().ok_or(StorageError::IoError)
    }
}

#[cfg(not(target_os = "espidf"))]
impl NvsAdapter {
    pub fn new() -> Self {
        info!("NvsAdapter: simulation backend");
        Self {
            store: HashMap::new(),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for NvsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let data = self.store.get(key).ok_or(StorageError::NotFound)?;
            if data.len() > buf.len() {
                return Err(StorageError::Corrupted);
            }
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }

        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::ESP_ERR_NVS_INVALID_LENGTH;

            match self.handle()?.get_raw(key, buf) {
                Ok(Some(data)) => Ok(data.len()),
                Ok(None) => Err(StorageError::NotFound),
                Err(e) if e.code() == ESP_ERR_NVS_INVALID_LENGTH => Err(StorageError::Corrupted),
                Err(e) => {
                    warn!("NvsAdapter: read '{}' failed: {}", key, e);
                    Err(StorageError::IoError)
                }
            }
        }
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store.insert(key.to_string(), data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::ESP_ERR_NVS_NOT_ENOUGH_SPACE;

            self.handle_mut()?.set_raw(key, data).map(|_| ()).map_err(|e| {
                warn!("NvsAdapter: write '{}' ({} bytes) failed: {}", key, data.len(), e);
                if e.code() == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                    StorageError::Full
                } else {
                    StorageError::IoError
                }
            })
        }
    }

    fn exists(&self, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            self.store.contains_key(key)
        }

        #[cfg(target_os = "espidf")]
        {
            self.handle().is_ok_and(|nvs| nvs.contains(key).unwrap_or(false))
        }
    }
}
