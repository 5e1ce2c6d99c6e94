//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the heater relay output, the two button inputs and the temperature
//! probe, exposing them through [`RelayPort`], [`ButtonPort`] and
//! [`TemperatureProbe`].  Pins are any `embedded-hal` 1.0 digital pins; on
//! the board they are the [`gpio`](crate::drivers::gpio) wrappers.
//!
//! A failed button read is logged and treated as "not pressed".  A failed
//! relay write is logged and reported to the caller, and `heater_on()`
//! keeps the last level that was actually applied.

use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use log::warn;

use crate::app::ports::{Button, ButtonPort, RelayError, RelayPort, TemperatureProbe};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R, U, D, P> {
    relay: R,
    up: U,
    down: D,
    probe: P,
    buttons_active_low: bool,
    heater_on: bool,
}

impl<R, U, D, P> HardwareAdapter<R, U, D, P>
where
    R: OutputPin,
    U: InputPin,
    D: InputPin,
    P: TemperatureProbe,
{
    pub fn new(relay: R, up: U, down: D, probe: P, buttons_active_low: bool) -> Self {
        Self {
            relay,
            up,
            down,
            probe,
            buttons_active_low,
            heater_on: false,
        }
    }

    /// Last relay level successfully written.
    pub fn heater_on(&self) -> bool {
        self.heater_on
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<R, U, D, P> RelayPort for HardwareAdapter<R, U, D, P>
where
    R: OutputPin,
{
    fn set_heater(&mut self, on: bool) -> Result<(), RelayError> {
        let result = if on {
            self.relay.set_high()
        } else {
            self.relay.set_low()
        };
        match result {
            Ok(()) => {
                self.heater_on = on;
                Ok(())
            }
            Err(e) => {
                warn!("Heater relay write failed ({:?}), on={}", e, on);
                Err(RelayError::WriteFailed)
            }
        }
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<R, U, D, P> ButtonPort for HardwareAdapter<R, U, D, P>
where
    U: InputPin,
    D: InputPin,
{
    fn is_pressed(&mut self, button: Button) -> bool {
        // The two pins may have different error types; unify on the kind.
        let level = match button {
            Button::Up => self.up.is_high().map_err(|e| e.kind()),
            Button::Down => self.down.is_high().map_err(|e| e.kind()),
        };
        match level {
            Ok(high) => high != self.buttons_active_low,
            Err(kind) => {
                warn!("{:?} button read failed ({:?})", button, kind);
                false
            }
        }
    }
}

// ── TemperatureProbe implementation ───────────────────────────

impl<R, U, D, P> TemperatureProbe for HardwareAdapter<R, U, D, P>
where
    P: TemperatureProbe,
{
    fn request_reading(&mut self) -> f32 {
        self.probe.request_reading()
    }
}
