//! Inbound commands to the thermostat service.
//!
//! The input debouncer's gestures map onto these; any other inbound source
//! (a serial console, a test harness) can drive the same operations through
//! [`Thermostat::handle_command`](super::service::Thermostat::handle_command).

use crate::app::ports::Button;
use crate::drivers::button::Gesture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Raise the in-memory setpoint by one step.
    IncreaseSetpoint,
    /// Lower the in-memory setpoint by one step.
    DecreaseSetpoint,
    /// Persist the current setpoint.
    SaveSetpoint,
}

impl From<Gesture> for AppCommand {
    fn from(gesture: Gesture) -> Self {
        match gesture {
            Gesture::SinglePress(Button::Up) => Self::IncreaseSetpoint,
            Gesture::SinglePress(Button::Down) => Self::DecreaseSetpoint,
            Gesture::CombinedHold => Self::SaveSetpoint,
        }
    }
}
