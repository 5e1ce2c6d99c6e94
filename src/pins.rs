//! GPIO / peripheral pin assignments for the incubator controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Heater
// ---------------------------------------------------------------------------

/// Digital output to the heater relay driver (HIGH = energised).
pub const HEATER_RELAY_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Temperature probe (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor, 10 kOhm @ 25 C, voltage divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const PROBE_ADC_GPIO: i32 = 9;
pub const PROBE_ADC_CHANNEL: u32 = 8;

// ---------------------------------------------------------------------------
// Front-panel buttons
// ---------------------------------------------------------------------------

/// Setpoint up. Level polarity set by `buttons_active_low` in config.
pub const BUTTON_UP_GPIO: i32 = 12;
/// Setpoint down.
pub const BUTTON_DOWN_GPIO: i32 = 13;
