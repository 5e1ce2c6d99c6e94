//! Setpoint store and the persisted settings record.
//!
//! ## Storage layout
//!
//! | Offset | Size | Field                                        |
//! |--------|------|----------------------------------------------|
//! | 0      | 1    | initialised marker (sentinel)                |
//! | 1      | 1/4  | setpoint: truncated byte, or `f32` LE        |
//!
//! Each encoding has its own sentinel, so a record written under one
//! encoding is still decoded correctly after the config switches to the
//! other.  Any other marker byte means the device was never initialised.

use log::{info, warn};

use crate::app::ports::{SettingsStorage, StorageError};
use crate::config::{SetpointBounds, SetpointEncoding, ThermostatConfig};

pub const MARKER_OFFSET: usize = 0;
pub const SETPOINT_OFFSET: usize = 1;

/// Marker for a one-byte whole-degree setpoint.
pub const SENTINEL_WHOLE_DEGREE: u8 = 0x5A;
/// Marker for a four-byte `f32` setpoint.
pub const SENTINEL_FULL: u8 = 0x5B;

/// Largest encoded record (marker + `f32`).
pub const RECORD_MAX_LEN: usize = 5;

/// In-memory image of the persisted settings record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedSettings {
    pub encoding: SetpointEncoding,
    pub setpoint_c: f32,
}

impl PersistedSettings {
    /// Encode into `buf`, returning the number of bytes used.
    pub fn encode(&self, buf: &mut [u8; RECORD_MAX_LEN]) -> usize {
        match self.encoding {
            SetpointEncoding::WholeDegree => {
                buf[MARKER_OFFSET] = SENTINEL_WHOLE_DEGREE;
                // `as u8` truncates toward zero and saturates to 0..=255.
                buf[SETPOINT_OFFSET] = self.setpoint_c as u8;
                2
            }
            SetpointEncoding::Full => {
                buf[MARKER_OFFSET] = SENTINEL_FULL;
                buf[SETPOINT_OFFSET..RECORD_MAX_LEN]
                    .copy_from_slice(&self.setpoint_c.to_le_bytes());
                RECORD_MAX_LEN
            }
        }
    }

    /// Decode a raw record.  `None` means the sentinel is absent.
    pub fn decode(raw: &[u8; RECORD_MAX_LEN]) -> Option<Self> {
        match raw[MARKER_OFFSET] {
            SENTINEL_WHOLE_DEGREE => Some(Self {
                encoding: SetpointEncoding::WholeDegree,
                setpoint_c: f32::from(raw[SETPOINT_OFFSET]),
            }),
            SENTINEL_FULL => {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(&raw[SETPOINT_OFFSET..RECORD_MAX_LEN]);
                let setpoint_c = f32::from_le_bytes(bytes);
                setpoint_c.is_finite().then_some(Self {
                    encoding: SetpointEncoding::Full,
                    setpoint_c,
                })
            }
            _ => None,
        }
    }

    fn read_from(storage: &impl SettingsStorage) -> Result<[u8; RECORD_MAX_LEN], StorageError> {
        let mut raw = [0u8; RECORD_MAX_LEN];
        storage.read(MARKER_OFFSET, &mut raw)?;
        Ok(raw)
    }
}

/// Result of [`SetpointStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Storage already held the encoded setpoint; nothing was written.
    Unchanged,
    /// New bytes were written and committed.
    Written,
}

/// Owns the user setpoint.  Adjustments are in-memory only until
/// [`save`](Self::save) is called.
pub struct SetpointStore {
    setpoint_c: f32,
    default_c: f32,
    step_c: f32,
    bounds: Option<SetpointBounds>,
    encoding: SetpointEncoding,
    /// Set while a write or commit has failed; the stored bytes are then
    /// not trusted to reflect what reached flash.
    needs_write: bool,
}

impl SetpointStore {
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            setpoint_c: config.default_setpoint_c,
            default_c: config.default_setpoint_c,
            step_c: config.setpoint_step_c,
            bounds: config.setpoint_bounds,
            encoding: config.setpoint_encoding,
            needs_write: false,
        }
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint_c
    }

    /// Per-gesture adjustment size.
    pub fn step(&self) -> f32 {
        self.step_c
    }

    /// Restore the persisted setpoint, or initialise storage with the
    /// default on first boot (sentinel absent).
    pub fn load_or_initialize(
        &mut self,
        storage: &mut impl SettingsStorage,
    ) -> Result<f32, StorageError> {
        let raw = PersistedSettings::read_from(storage)?;
        match PersistedSettings::decode(&raw) {
            Some(settings) => {
                self.setpoint_c = settings.setpoint_c;
                info!(
                    "Setpoint: restored {:.1}\u{00b0}C ({:?})",
                    settings.setpoint_c, settings.encoding
                );
            }
            None => {
                warn!(
                    "Setpoint: storage uninitialised (marker=0x{:02x}), writing default {:.1}\u{00b0}C",
                    raw[MARKER_OFFSET], self.default_c
                );
                self.setpoint_c = self.default_c;
                self.persist(storage)?;
            }
        }
        Ok(self.setpoint_c)
    }

    /// Change the in-memory setpoint by `delta`.  Does not persist.
    ///
    /// Unbounded unless `setpoint_bounds` is configured.
    pub fn adjust(&mut self, delta: f32) -> f32 {
        let next = self.setpoint_c + delta;
        self.setpoint_c = match self.bounds {
            Some(bounds) => bounds.clamp(next),
            None => next,
        };
        self.setpoint_c
    }

    /// Write the in-memory setpoint to storage.  Skips the write when the
    /// stored record already matches, so repeated saves are byte-identical.
    /// After a failed persist the next save always writes.
    pub fn save(&mut self, storage: &mut impl SettingsStorage) -> Result<SaveOutcome, StorageError> {
        let mut encoded = [0u8; RECORD_MAX_LEN];
        let len = self.record().encode(&mut encoded);
        let stored = PersistedSettings::read_from(storage)?;
        if !self.needs_write && stored[..len] == encoded[..len] {
            return Ok(SaveOutcome::Unchanged);
        }
        self.persist(storage)?;
        info!("Setpoint: saved {:.1}\u{00b0}C", self.setpoint_c);
        Ok(SaveOutcome::Written)
    }

    fn record(&self) -> PersistedSettings {
        PersistedSettings {
            encoding: self.encoding,
            setpoint_c: self.setpoint_c,
        }
    }

    fn persist(&mut self, storage: &mut impl SettingsStorage) -> Result<(), StorageError> {
        let mut encoded = [0u8; RECORD_MAX_LEN];
        let len = self.record().encode(&mut encoded);
        self.needs_write = true;
        storage.write(MARKER_OFFSET, &encoded[..len])?;
        storage.commit()?;
        self.needs_write = false;
        Ok(())
    }
}
