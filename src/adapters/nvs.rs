//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`SettingsStorage`] and [`ConfigPort`] for the incubator.
//!
//! - **Settings region**: a small byte-addressable EEPROM image kept in RAM
//!   and flushed to a single NVS blob on [`commit`](SettingsStorage::commit).
//!   Fresh storage reads as erased flash (`0xFF`), so the setpoint sentinel
//!   is absent on first boot.  A failed commit rolls the image back to the
//!   last committed bytes.
//! - **Config**: the [`ThermostatConfig`] as a postcard blob, validated on
//!   both load and save.
//!
//! On ESP32 the blobs live in the default NVS partition; ESP-IDF NVS commits
//! are atomic per `nvs_commit()`.  On host a simulation backend holds the
//! committed bytes so tests can power-cycle the adapter.

use crate::app::ports::{ConfigError, ConfigPort, SettingsStorage, StorageError};
use crate::config::ThermostatConfig;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Size of the emulated EEPROM region.
pub const REGION_LEN: usize = 16;
const ERASED: u8 = 0xFF;

#[cfg(target_os = "espidf")]
const NAMESPACE: &[u8] = b"incubator\0";
#[cfg(target_os = "espidf")]
const SETTINGS_KEY: &[u8] = b"settings\0";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &[u8] = b"thermocfg\0";
#[cfg(target_os = "espidf")]
const MAX_CONFIG_BLOB: usize = 512;

/// Committed bytes of the simulation backend.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, Default)]
struct SimFlash {
    settings: Option<[u8; REGION_LEN]>,
    config: Option<Vec<u8>>,
    commits: usize,
    fail_next_commit: bool,
}

pub struct NvsAdapter {
    /// Working image of the settings region.
    region: [u8; REGION_LEN],
    /// Last image known to be in flash.
    committed: [u8; REGION_LEN],
    #[cfg(not(target_os = "espidf"))]
    flash: SimFlash,
}

impl NvsAdapter {
    /// Create a new NvsAdapter, initialise NVS flash and load the settings
    /// region.
    ///
    /// Returns `Err(StorageError::IoError)` if flash initialisation fails
    /// unrecoverably.  On a version mismatch the NVS partition is erased and
    /// re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }

            let mut region = [ERASED; REGION_LEN];
            match Self::read_blob(SETTINGS_KEY, &mut region) {
                Ok(_) => info!("NvsAdapter: settings region loaded"),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsAdapter: no settings region yet (erased)");
                    region = [ERASED; REGION_LEN];
                }
                Err(e) => {
                    warn!("NvsAdapter: settings read error {}", e);
                    return Err(StorageError::IoError);
                }
            }
            Ok(Self {
                region,
                committed: region,
            })
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NvsAdapter: simulation backend");
            Ok(Self {
                region: [ERASED; REGION_LEN],
                committed: [ERASED; REGION_LEN],
                flash: SimFlash::default(),
            })
        }
    }

    /// Open the namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(key: &[u8], buf: &mut [u8]) -> Result<usize, i32> {
        Self::with_nvs_handle(false, |handle| {
            let mut size = buf.len();
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key.as_ptr() as *const _,
                    buf.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(size)
        })
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(key: &[u8], data: &[u8]) -> Result<(), i32> {
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    key.as_ptr() as *const _,
                    data.as_ptr() as *const _,
                    data.len(),
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
    }

    /// Number of successful settings commits (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn commit_count(&self) -> usize {
        self.flash.commits
    }

    /// Bytes currently committed to the simulated flash.
    #[cfg(not(target_os = "espidf"))]
    pub fn committed_region(&self) -> Option<[u8; REGION_LEN]> {
        self.flash.settings
    }

    /// Make the next settings commit fail with `IoError` (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_commit(&mut self) {
        self.flash.fail_next_commit = true;
    }

    /// Drop uncommitted writes and reload from the simulated flash, as a
    /// power cycle would.
    #[cfg(not(target_os = "espidf"))]
    #[must_use]
    pub fn power_cycle(self) -> Self {
        let region = self.flash.settings.unwrap_or([ERASED; REGION_LEN]);
        Self {
            region,
            committed: region,
            flash: self.flash,
        }
    }

    fn bounds(offset: usize, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let end = offset.checked_add(len).ok_or(StorageError::OutOfRange)?;
        if end > REGION_LEN {
            return Err(StorageError::OutOfRange);
        }
        Ok(offset..end)
    }
}

impl SettingsStorage for NvsAdapter {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let range = Self::bounds(offset, buf.len())?;
        buf.copy_from_slice(&self.region[range]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let range = Self::bounds(offset, data.len())?;
        self.region[range].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        let result = if core::mem::take(&mut self.flash.fail_next_commit) {
            warn!("NvsAdapter: settings commit error (simulated)");
            Err(StorageError::IoError)
        } else {
            self.flash.settings = Some(self.region);
            self.flash.commits += 1;
            Ok(())
        };

        #[cfg(target_os = "espidf")]
        let result = Self::write_blob(SETTINGS_KEY, &self.region).map_err(|e| {
            warn!("NvsAdapter: settings commit error {}", e);
            StorageError::IoError
        });

        match result {
            Ok(()) => self.committed = self.region,
            Err(_) => self.region = self.committed,
        }
        result
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<ThermostatConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        let stored = self.flash.config.clone();

        #[cfg(target_os = "espidf")]
        let stored = {
            let mut buf = vec![0u8; MAX_CONFIG_BLOB];
            match Self::read_blob(CONFIG_KEY, &mut buf) {
                Ok(size) => {
                    buf.truncate(size);
                    Some(buf)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => None,
                Err(e) => {
                    warn!("NvsAdapter: config read error {}", e);
                    return Err(ConfigError::IoError);
                }
            }
        };

        match stored {
            Some(bytes) => {
                let cfg: ThermostatConfig =
                    postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.validate()?;
                info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
                Ok(cfg)
            }
            None => {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(ThermostatConfig::default())
            }
        }
    }

    fn save(&mut self, config: &ThermostatConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.flash.config = Some(bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            if bytes.len() > MAX_CONFIG_BLOB {
                return Err(ConfigError::StorageFull);
            }
            match Self::write_blob(CONFIG_KEY, &bytes) {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}
