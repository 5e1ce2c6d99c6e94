//! Thermostat service — the hexagonal core.
//!
//! [`Thermostat`] owns the debouncer, setpoint store, sampler and heater
//! controller.  All I/O flows through port traits injected at call sites,
//! making the whole control cycle testable with mock adapters.
//!
//! ```text
//!  ButtonPort ───────▶ ┌──────────────────────────┐ ──▶ EventSink
//!  TemperatureProbe ─▶ │        Thermostat        │ ──▶ DisplayPort
//!  SettingsStorage ◀─▶ │ Debouncer · Setpoint     │
//!  RelayPort ◀──────── │ Sampler · Heater         │
//!                      └──────────────────────────┘
//! ```
//!
//! One [`tick`](Thermostat::tick) is one full pass: gestures → setpoint →
//! sample → heater decision → relay.  Changed fields accumulate in
//! [`DirtyFlags`] until [`render_if_dirty`](Thermostat::render_if_dirty)
//! hands them to the presentation layer.

use log::{error, info, warn};

use crate::config::{SensorFaultPolicy, ThermostatConfig};
use crate::control::heater::{HeaterController, HeaterParams, HeaterState};
use crate::control::setpoint::SetpointStore;
use crate::display::{DirtyFlags, DisplayFrame, Uptime};
use crate::drivers::button::InputDebouncer;
use crate::sensors::{TemperatureReading, TemperatureSampler};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{
    Button, ButtonPort, DisplayPort, EventSink, RelayPort, SettingsStorage, StorageError,
    TemperatureProbe,
};

// ───────────────────────────────────────────────────────────────
// Thermostat
// ───────────────────────────────────────────────────────────────

pub struct Thermostat {
    fault_policy: SensorFaultPolicy,
    debouncer: InputDebouncer,
    setpoint: SetpointStore,
    sampler: TemperatureSampler,
    heater: HeaterController,
    sensor_fault: bool,
    dirty: DirtyFlags,
    /// Clock reading at the previous tick; elapsed time accumulates from
    /// successive deltas so it survives the `u32` wrap.
    last_tick_ms: u32,
    elapsed_ms: u64,
    uptime: Uptime,
    uptime_secs: u64,
}

impl Thermostat {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch storage or the relay — call [`start`](Self::start) next.
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            fault_policy: config.sensor_fault_policy,
            debouncer: InputDebouncer::from_config(config),
            setpoint: SetpointStore::new(config),
            sampler: TemperatureSampler::new(config),
            heater: HeaterController::new(HeaterParams::from(config)),
            sensor_fault: false,
            dirty: DirtyFlags::ALL,
            last_tick_ms: 0,
            elapsed_ms: 0,
            uptime: Uptime::default(),
            uptime_secs: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore the setpoint, drive the relay to match the initial `Off`
    /// state, and mark every display field dirty.
    ///
    /// A storage failure is returned after the relay is synchronised; the
    /// service stays usable with the default setpoint.
    pub fn start(
        &mut self,
        now_ms: u32,
        storage: &mut impl SettingsStorage,
        relay: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> Result<(), StorageError> {
        self.last_tick_ms = now_ms;
        self.elapsed_ms = 0;
        if let Err(e) = relay.set_heater(self.heater.state().is_on()) {
            error!("Heater relay could not be driven off at start: {}", e);
        }
        self.dirty = DirtyFlags::ALL;

        let restored = self.setpoint.load_or_initialize(storage);
        let setpoint_c = self.setpoint.setpoint();
        sink.emit(&AppEvent::Started { setpoint_c });
        match restored {
            Ok(_) => {
                info!("Thermostat started, setpoint {:.1}\u{00b0}C", setpoint_c);
                Ok(())
            }
            Err(e) => {
                error!(
                    "Setpoint restore failed ({}), running with {:.1}\u{00b0}C",
                    e, setpoint_c
                );
                Err(e)
            }
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.  Returns the dirty fields pending for
    /// the presentation layer.
    ///
    /// The `hw` parameter satisfies the button, probe **and** relay ports —
    /// this avoids a triple mutable borrow while keeping the port boundary
    /// explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl ButtonPort + TemperatureProbe + RelayPort),
        storage: &mut impl SettingsStorage,
        sink: &mut impl EventSink,
    ) -> DirtyFlags {
        // 1. Gestures → setpoint mutation / persistence
        let up = hw.is_pressed(Button::Up);
        let down = hw.is_pressed(Button::Down);
        if let Some(gesture) = self.debouncer.update(now_ms, up, down) {
            self.handle_command(AppCommand::from(gesture), storage, sink);
        }

        // 2. Sample the probe (interval-gated)
        let previous = self.sampler.latest();
        if let Some(reading) = self.sampler.poll(now_ms, &mut *hw) {
            self.on_reading(previous, reading, sink);
        }

        // 3. Heater decision → relay
        self.evaluate_heater(now_ms, hw, sink);

        // 4. Clock
        self.elapsed_ms += u64::from(now_ms.wrapping_sub(self.last_tick_ms));
        self.last_tick_ms = now_ms;
        let secs = self.elapsed_ms / 1000;
        if secs != self.uptime_secs {
            self.uptime_secs = secs;
            self.uptime = Uptime::from_secs(secs);
            self.dirty.clock = true;
        }

        self.dirty
    }

    /// Hand the frame to the presentation layer if anything changed since
    /// the last refresh.  Returns `true` if a render happened.
    pub fn render_if_dirty(&mut self, display: &mut impl DisplayPort) -> bool {
        if !self.dirty.any() {
            return false;
        }
        display.render(&self.frame(), self.dirty);
        self.dirty = DirtyFlags::default();
        true
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a setpoint command (from a gesture or any other inbound source).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        storage: &mut impl SettingsStorage,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::IncreaseSetpoint => self.adjust_setpoint(self.setpoint.step(), sink),
            AppCommand::DecreaseSetpoint => self.adjust_setpoint(-self.setpoint.step(), sink),
            AppCommand::SaveSetpoint => {
                let setpoint_c = self.setpoint.setpoint();
                match self.setpoint.save(storage) {
                    Ok(outcome) => {
                        info!("Setpoint save acknowledged ({:?})", outcome);
                        sink.emit(&AppEvent::SetpointSaved {
                            setpoint_c,
                            outcome,
                        });
                    }
                    Err(e) => {
                        error!("Setpoint save failed: {}", e);
                        sink.emit(&AppEvent::SaveFailed(e));
                    }
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame {
            current_c: self.sampler.latest().map(|r| r.celsius),
            setpoint_c: self.setpoint.setpoint(),
            heater: self.heater.state(),
            uptime: self.uptime,
            sensor_fault: self.sensor_fault,
        }
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint.setpoint()
    }

    pub fn heater_state(&self) -> HeaterState {
        self.heater.state()
    }

    pub fn latest_reading(&self) -> Option<TemperatureReading> {
        self.sampler.latest()
    }

    /// Latest reading is outside the plausible range.
    pub fn sensor_fault(&self) -> bool {
        self.sensor_fault
    }

    // ── Internal ──────────────────────────────────────────────

    fn adjust_setpoint(&mut self, delta: f32, sink: &mut impl EventSink) {
        let from_c = self.setpoint.setpoint();
        let to_c = self.setpoint.adjust(delta);
        if to_c != from_c {
            self.dirty.setpoint = true;
            info!("Setpoint {:.1} -> {:.1}\u{00b0}C (unsaved)", from_c, to_c);
            sink.emit(&AppEvent::SetpointAdjusted { from_c, to_c });
        }
    }

    fn on_reading(
        &mut self,
        previous: Option<TemperatureReading>,
        reading: TemperatureReading,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Reading {
            celsius: reading.celsius,
            fault: reading.fault,
        });

        if previous.map(|p| p.celsius) != Some(reading.celsius) {
            self.dirty.temperature = true;
        }

        if reading.fault != self.sensor_fault {
            self.sensor_fault = reading.fault;
            self.dirty.temperature = true;
            if reading.fault {
                warn!("Probe fault: implausible reading {:.1}\u{00b0}C", reading.celsius);
                sink.emit(&AppEvent::SensorFault {
                    celsius: reading.celsius,
                });
            } else {
                info!("Probe recovered: {:.1}\u{00b0}C", reading.celsius);
                sink.emit(&AppEvent::SensorRecovered {
                    celsius: reading.celsius,
                });
            }
        }
    }

    fn evaluate_heater(&mut self, now_ms: u32, relay: &mut impl RelayPort, sink: &mut impl EventSink) {
        let Some(reading) = self.sampler.latest() else {
            return;
        };
        if reading.fault && self.fault_policy == SensorFaultPolicy::FreezeHeater {
            return;
        }
        let setpoint_c = self.setpoint.setpoint();
        let Some(transition) = self.heater.propose(reading.celsius, setpoint_c, now_ms) else {
            return;
        };
        // Commit only once the relay has switched; a failed write is
        // retried on the next cycle.
        if let Err(e) = relay.set_heater(transition.to.is_on()) {
            warn!("Heater {:?} -> {:?} not applied: {}", transition.from, transition.to, e);
            return;
        }
        self.heater.apply(transition);
        self.dirty.heater = true;
        info!(
            "Heater {:?} -> {:?} ({:?}) at {:.1}/{:.1}\u{00b0}C",
            transition.from, transition.to, transition.reason, reading.celsius, setpoint_c
        );
        sink.emit(&AppEvent::HeaterSwitched(transition));
    }
}
