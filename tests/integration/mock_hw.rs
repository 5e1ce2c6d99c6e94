//! Mock hardware and a stepping harness for integration tests.
//!
//! Records every relay call and every emitted event so tests can assert on
//! the full history without touching real GPIO registers.  Storage is the
//! real [`NvsAdapter`] simulation backend, so power cycles are realistic.

use incubator::adapters::nvs::NvsAdapter;
use incubator::app::events::AppEvent;
use incubator::app::ports::{
    Button, ButtonPort, DisplayPort, EventSink, RelayError, RelayPort, TemperatureProbe,
};
use incubator::app::service::Thermostat;
use incubator::config::ThermostatConfig;
use incubator::control::heater::HeaterTransition;
use incubator::display::{DirtyFlags, DisplayFrame, TextLayout};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub temperature_c: f32,
    pub up: bool,
    pub down: bool,
    pub relay_calls: Vec<bool>,
    pub relay_broken: bool,
    pub probe_requests: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(temperature_c: f32) -> Self {
        Self {
            temperature_c,
            up: false,
            down: false,
            relay_calls: Vec::new(),
            relay_broken: false,
            probe_requests: 0,
        }
    }

    pub fn relay_on(&self) -> bool {
        self.relay_calls.last().copied().unwrap_or(false)
    }
}

impl ButtonPort for MockHardware {
    fn is_pressed(&mut self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
        }
    }
}

impl TemperatureProbe for MockHardware {
    fn request_reading(&mut self) -> f32 {
        self.probe_requests += 1;
        self.temperature_c
    }
}

impl RelayPort for MockHardware {
    /// Only successful writes are recorded.
    fn set_heater(&mut self, on: bool) -> Result<(), RelayError> {
        if self.relay_broken {
            return Err(RelayError::WriteFailed);
        }
        self.relay_calls.push(on);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn transitions(&self) -> Vec<HeaterTransition> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::HeaterSwitched(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingDisplay {
    pub rows: [String; 4],
    pub renders: Vec<DirtyFlags>,
}

impl DisplayPort for RecordingDisplay {
    fn render(&mut self, frame: &DisplayFrame, dirty: DirtyFlags) {
        for (row, text) in TextLayout::dirty_lines(frame, dirty) {
            self.rows[row] = text.as_str().to_owned();
        }
        self.renders.push(dirty);
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// One thermostat wired to mocks, advanced in fixed control-loop steps.
pub struct Rig {
    pub app: Thermostat,
    pub hw: MockHardware,
    pub nvs: NvsAdapter,
    pub sink: RecordingSink,
    pub display: RecordingDisplay,
    pub now_ms: u32,
    pub step_ms: u32,
}

#[allow(dead_code)]
impl Rig {
    pub fn boot(config: ThermostatConfig, temperature_c: f32) -> Self {
        Self::boot_with(config, temperature_c, NvsAdapter::new().unwrap())
    }

    pub fn boot_with(config: ThermostatConfig, temperature_c: f32, nvs: NvsAdapter) -> Self {
        let mut rig = Self {
            app: Thermostat::new(&config),
            hw: MockHardware::new(temperature_c),
            nvs,
            sink: RecordingSink::default(),
            display: RecordingDisplay::default(),
            now_ms: 0,
            step_ms: config.control_loop_interval_ms,
        };
        rig.app
            .start(rig.now_ms, &mut rig.nvs, &mut rig.hw, &mut rig.sink)
            .unwrap();
        rig
    }

    /// Run one control cycle at the current time, refresh the display,
    /// then advance the clock by one step.
    pub fn tick(&mut self) {
        self.app
            .tick(self.now_ms, &mut self.hw, &mut self.nvs, &mut self.sink);
        self.app.render_if_dirty(&mut self.display);
        self.now_ms = self.now_ms.wrapping_add(self.step_ms);
    }

    pub fn run_for(&mut self, ms: u32) {
        for _ in 0..ms.div_ceil(self.step_ms) {
            self.tick();
        }
    }

    /// Clean press-and-release of one button.
    pub fn click(&mut self, button: Button) {
        self.set_button(button, true);
        self.run_for(100);
        self.set_button(button, false);
        self.run_for(100);
    }

    /// Hold both buttons for `ms`, then release both.
    pub fn hold_both(&mut self, ms: u32) {
        self.hw.up = true;
        self.hw.down = true;
        self.run_for(ms);
        self.hw.up = false;
        self.hw.down = false;
        self.run_for(100);
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        match button {
            Button::Up => self.hw.up = pressed,
            Button::Down => self.hw.down = pressed,
        }
    }
}
