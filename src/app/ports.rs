//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Thermostat (domain)
//! ```
//!
//! Driven adapters (probe, relay, buttons, storage, display, event sinks)
//! implement these traits.  The [`Thermostat`](super::service::Thermostat)
//! consumes them via generics, so the domain core never touches hardware
//! or process-wide singletons directly.

use crate::config::ThermostatConfig;
use crate::display::{DirtyFlags, DisplayFrame};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter.  Wraps at `u32::MAX`; consumers
/// compare instants with `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Sensor transport (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Sentinel reported by the probe transport when the sensor is absent.
pub const PROBE_DISCONNECTED_C: f32 = -127.0;

/// Blocking, bounded-time temperature request.
///
/// Implementations never fail outright: a disconnected or shorted probe is
/// reported as [`PROBE_DISCONNECTED_C`] (or another out-of-range value) and
/// classified by the sampler.
pub trait TemperatureProbe {
    fn request_reading(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Relay output (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Binary heater actuation.  No feedback beyond whether the write landed.
///
/// The controller only commits a state change after `Ok`, so the relay
/// level and `HeaterState` stay in agreement when a write fails.
pub trait RelayPort {
    fn set_heater(&mut self, on: bool) -> Result<(), RelayError>;
}

// ───────────────────────────────────────────────────────────────
// Raw button inputs
// ───────────────────────────────────────────────────────────────

/// The two setpoint buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
}

/// Raw (un-debounced) button levels, already normalised to "pressed".
/// Only the input debouncer calls this.
pub trait ButtonPort {
    fn is_pressed(&mut self, button: Button) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Presentation layer
// ───────────────────────────────────────────────────────────────

/// Receives the current core state and the fields that changed since the
/// last refresh.  Produces nothing back into the core.
pub trait DisplayPort {
    fn render(&mut self, frame: &DisplayFrame, dirty: DirtyFlags);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings storage (driven adapter: domain ↔ EEPROM / NVS)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable persistent storage for the settings record.
///
/// Writes are synchronous: once [`commit`](Self::commit) returns `Ok`, the
/// bytes survive a power cycle.
pub trait SettingsStorage {
    /// Fill `buf` with the bytes starting at `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Stage `data` at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    /// Flush staged writes to the medium.
    fn commit(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the thermostat configuration.
///
/// Implementations MUST call [`ThermostatConfig::validate`] before
/// persisting and after loading.
pub trait ConfigPort {
    /// Returns [`ThermostatConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<ThermostatConfig, ConfigError>;

    fn save(&mut self, config: &ThermostatConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`SettingsStorage`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Offset + length runs past the end of the region.
    OutOfRange,
    /// Backing partition or key is missing.
    NotFound,
    /// Generic I/O error.
    IoError,
}

/// Errors from [`RelayPort`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayError {
    /// The output pin rejected the write.
    WriteFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "access out of range"),
            Self::NotFound => write!(f, "storage not found"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for RelayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "relay write failed"),
        }
    }
}
