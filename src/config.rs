//! Thermostat configuration parameters
//!
//! All tunable parameters for the incubator controller.
//! Values can be overridden via NVS (non-volatile storage); the stored blob
//! is validated with [`ThermostatConfig::validate`] before use.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Optional clamp applied to setpoint adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetpointBounds {
    pub min_c: f32,
    pub max_c: f32,
}

impl SetpointBounds {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min_c, self.max_c)
    }
}

/// What the control cycle does with a reading outside the plausible range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorFaultPolicy {
    /// Feed the value to the heater controller anyway (legacy behaviour).
    Evaluate,
    /// Skip the heater decision while faulted; the relay keeps its last state.
    FreezeHeater,
}

/// Layout of the setpoint byte(s) at offset 1 of the settings region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetpointEncoding {
    /// One byte, integer-truncated. Whole-degree granularity across reboots.
    WholeDegree,
    /// Four bytes, little-endian `f32`.
    Full,
}

/// Core thermostat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermostatConfig {
    // --- Setpoint ---
    /// Setpoint written on first boot (°C)
    pub default_setpoint_c: f32,
    /// Change applied by one increment/decrement gesture (°C)
    pub setpoint_step_c: f32,
    /// Optional adjustment clamp; `None` keeps the setpoint unbounded
    pub setpoint_bounds: Option<SetpointBounds>,
    /// How the setpoint is laid out in persistent storage
    pub setpoint_encoding: SetpointEncoding,

    // --- Heater control ---
    /// Window below the setpoint where dwell gating applies (°C)
    pub hysteresis_band_c: f32,
    /// Margin below the setpoint required to re-fire inside the band (°C)
    pub turn_on_threshold_c: f32,
    /// Minimum off-time before re-firing and maximum continuous on-time (ms)
    pub min_dwell_ms: u32,

    // --- Sensor ---
    /// Probe sampling interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Lowest reading treated as physically plausible (°C)
    pub plausible_min_c: f32,
    /// Highest reading treated as physically plausible (°C)
    pub plausible_max_c: f32,
    pub sensor_fault_policy: SensorFaultPolicy,

    // --- Buttons ---
    /// Time a raw level must stay stable before it is accepted (milliseconds)
    pub debounce_ms: u32,
    /// Dual-press duration that commits the setpoint (milliseconds)
    pub combined_hold_ms: u32,
    /// Buttons pull the pin low when pressed
    pub buttons_active_low: bool,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Setpoint
            default_setpoint_c: 22.0,
            setpoint_step_c: 1.0,
            setpoint_bounds: None,
            setpoint_encoding: SetpointEncoding::WholeDegree,

            // Heater control
            hysteresis_band_c: 2.0,
            turn_on_threshold_c: 0.3,
            min_dwell_ms: 30_000,

            // Sensor (DS18B20-class probe range)
            sample_interval_ms: 5_000,
            plausible_min_c: -55.0,
            plausible_max_c: 125.0,
            sensor_fault_policy: SensorFaultPolicy::Evaluate,

            // Buttons
            debounce_ms: 20,
            combined_hold_ms: 2_000,
            buttons_active_low: true,

            // Timing
            control_loop_interval_ms: 50, // 20 Hz
        }
    }
}

impl ThermostatConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.setpoint_step_c > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "setpoint_step_c must be > 0",
            ));
        }
        if !(self.hysteresis_band_c > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "hysteresis_band_c must be > 0",
            ));
        }
        if !(self.turn_on_threshold_c >= 0.0 && self.turn_on_threshold_c < self.hysteresis_band_c)
        {
            return Err(ConfigError::ValidationFailed(
                "turn_on_threshold_c must be 0 <= x < hysteresis_band_c",
            ));
        }
        if self.min_dwell_ms == 0 {
            return Err(ConfigError::ValidationFailed("min_dwell_ms must be > 0"));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be > 0",
            ));
        }
        if !(self.plausible_min_c < self.plausible_max_c) {
            return Err(ConfigError::ValidationFailed(
                "plausible_min_c must be < plausible_max_c",
            ));
        }
        if self.combined_hold_ms <= self.debounce_ms {
            return Err(ConfigError::ValidationFailed(
                "combined_hold_ms must exceed debounce_ms",
            ));
        }
        if !(10..=1000).contains(&self.control_loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be 10–1000",
            ));
        }
        if let Some(bounds) = self.setpoint_bounds {
            if !(bounds.min_c < bounds.max_c) {
                return Err(ConfigError::ValidationFailed(
                    "setpoint_bounds.min_c must be < max_c",
                ));
            }
            if !(bounds.min_c..=bounds.max_c).contains(&self.default_setpoint_c) {
                return Err(ConfigError::ValidationFailed(
                    "default_setpoint_c must lie within setpoint_bounds",
                ));
            }
        }
        Ok(())
    }
}
