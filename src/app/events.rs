//! Outbound application events.
//!
//! The [`Thermostat`](super::service::Thermostat) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::control::heater::HeaterTransition;
use crate::control::setpoint::SaveOutcome;
use crate::app::ports::StorageError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started with the restored (or default) setpoint.
    Started { setpoint_c: f32 },

    /// A gesture changed the in-memory setpoint.
    SetpointAdjusted { from_c: f32, to_c: f32 },

    /// The setpoint save gesture completed.
    SetpointSaved { setpoint_c: f32, outcome: SaveOutcome },

    /// The save gesture could not be acknowledged.
    SaveFailed(StorageError),

    /// A fresh probe sample arrived.
    Reading { celsius: f32, fault: bool },

    /// The heater relay switched.
    HeaterSwitched(HeaterTransition),

    /// The probe started reporting implausible values.
    SensorFault { celsius: f32 },

    /// The probe is back in the plausible range.
    SensorRecovered { celsius: f32 },
}
