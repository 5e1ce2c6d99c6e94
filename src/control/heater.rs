//! Two-regime bang-bang heater controller.
//!
//! ```text
//!            setpoint - band          setpoint
//!   ─────────────┼───────────────────────┼──────────────▶ °C
//!   fast recovery│     overshoot guard (dwell-gated)
//!   (heat now)   │  on:  T + threshold < SP, off ≥ dwell
//!                │  off: T ≥ SP
//! ```
//!
//! Far below the setpoint the heater is switched on immediately.  Inside
//! the guard band (and above the setpoint) it only re-fires after it has
//! been off for the full dwell interval, and turns off once the setpoint
//! is reached.  In either regime a heater that has been on continuously
//! for longer than the dwell interval is cut off.

use crate::config::ThermostatConfig;

/// Relay state.  There is no transitional state: a decision switches the
/// relay in the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaterState {
    #[default]
    Off,
    On,
}

impl HeaterState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchReason {
    /// Reading was outside the guard band, below the setpoint.
    FastRecovery,
    /// Inside the guard band, below `setpoint - threshold`, dwell elapsed.
    BelowThreshold,
    /// Reading reached the setpoint.
    ReachedSetpoint,
    /// Heater stayed on longer than the dwell interval.
    MaxOnTime,
}

/// A state change produced by [`HeaterController::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterTransition {
    pub from: HeaterState,
    pub to: HeaterState,
    pub reason: SwitchReason,
    pub at_ms: u32,
}

/// Tuning for the controller, lifted out of [`ThermostatConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterParams {
    pub hysteresis_band_c: f32,
    pub turn_on_threshold_c: f32,
    pub min_dwell_ms: u32,
}

impl From<&ThermostatConfig> for HeaterParams {
    fn from(config: &ThermostatConfig) -> Self {
        Self {
            hysteresis_band_c: config.hysteresis_band_c,
            turn_on_threshold_c: config.turn_on_threshold_c,
            min_dwell_ms: config.min_dwell_ms,
        }
    }
}

pub struct HeaterController {
    params: HeaterParams,
    state: HeaterState,
    last_on_ms: u32,
    last_off_ms: u32,
}

impl HeaterController {
    /// Starts `Off` with both transition stamps at boot (0 ms).
    pub fn new(params: HeaterParams) -> Self {
        Self {
            params,
            state: HeaterState::Off,
            last_on_ms: 0,
            last_off_ms: 0,
        }
    }

    pub fn state(&self) -> HeaterState {
        self.state
    }

    pub fn last_on_ms(&self) -> u32 {
        self.last_on_ms
    }

    pub fn last_off_ms(&self) -> u32 {
        self.last_off_ms
    }

    pub fn params(&self) -> HeaterParams {
        self.params
    }

    /// True when the reading is at/above the setpoint or within the band below it.
    pub fn overshoot_guard_active(&self, current_c: f32, setpoint_c: f32) -> bool {
        setpoint_c - current_c <= self.params.hysteresis_band_c
    }

    /// Run one control decision and commit it.  Returns the transition if
    /// the state changed.
    ///
    /// A non-finite reading compares false everywhere and therefore never
    /// turns the heater on; the max-on-time cutoff still applies.
    pub fn evaluate(
        &mut self,
        current_c: f32,
        setpoint_c: f32,
        now_ms: u32,
    ) -> Option<HeaterTransition> {
        let transition = self.propose(current_c, setpoint_c, now_ms)?;
        self.apply(transition);
        Some(transition)
    }

    /// The transition [`evaluate`](Self::evaluate) would make, without
    /// changing any state.  Pair with [`apply`](Self::apply) once the relay
    /// has actually switched.
    pub fn propose(&self, current_c: f32, setpoint_c: f32, now_ms: u32) -> Option<HeaterTransition> {
        let on_for = now_ms.wrapping_sub(self.last_on_ms);
        let off_for = now_ms.wrapping_sub(self.last_off_ms);
        let dwell = self.params.min_dwell_ms;

        let next = if self.overshoot_guard_active(current_c, setpoint_c) {
            match self.state {
                HeaterState::Off
                    if current_c + self.params.turn_on_threshold_c < setpoint_c
                        && off_for > dwell =>
                {
                    Some((HeaterState::On, SwitchReason::BelowThreshold))
                }
                HeaterState::On if current_c >= setpoint_c => {
                    Some((HeaterState::Off, SwitchReason::ReachedSetpoint))
                }
                HeaterState::On if on_for > dwell => {
                    Some((HeaterState::Off, SwitchReason::MaxOnTime))
                }
                _ => None,
            }
        } else {
            match self.state {
                HeaterState::Off if current_c < setpoint_c => {
                    Some((HeaterState::On, SwitchReason::FastRecovery))
                }
                HeaterState::On if on_for > dwell => {
                    Some((HeaterState::Off, SwitchReason::MaxOnTime))
                }
                _ => None,
            }
        };

        let (to, reason) = next?;
        Some(HeaterTransition {
            from: self.state,
            to,
            reason,
            at_ms: now_ms,
        })
    }

    /// Commit a transition from [`propose`](Self::propose): update the state
    /// and stamp the matching timestamp.
    pub fn apply(&mut self, transition: HeaterTransition) {
        self.state = transition.to;
        match transition.to {
            HeaterState::On => self.last_on_ms = transition.at_ms,
            HeaterState::Off => self.last_off_ms = transition.at_ms,
        }
    }
}
