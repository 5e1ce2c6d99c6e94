//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { setpoint_c } => {
                info!("START | setpoint={:.1}\u{00b0}C", setpoint_c);
            }
            AppEvent::SetpointAdjusted { from_c, to_c } => {
                info!("SETPT | {:.1} -> {:.1}\u{00b0}C (unsaved)", from_c, to_c);
            }
            AppEvent::SetpointSaved {
                setpoint_c,
                outcome,
            } => {
                info!("SETPT | saved {:.1}\u{00b0}C ({:?})", setpoint_c, outcome);
            }
            AppEvent::SaveFailed(e) => {
                warn!("SETPT | save failed: {}", e);
            }
            // Every sample lands here; keep it below the default level.
            AppEvent::Reading { celsius, fault } => {
                debug!(
                    "TEMP  | {:.2}\u{00b0}C{}",
                    celsius,
                    if *fault { " (fault)" } else { "" }
                );
            }
            AppEvent::HeaterSwitched(t) => {
                info!(
                    "HEAT  | {:?} -> {:?} at {} ms ({:?})",
                    t.from, t.to, t.at_ms, t.reason
                );
            }
            AppEvent::SensorFault { celsius } => {
                warn!("PROBE | fault, reading {:.1}\u{00b0}C", celsius);
            }
            AppEvent::SensorRecovered { celsius } => {
                info!("PROBE | recovered at {:.1}\u{00b0}C", celsius);
            }
        }
    }
}
