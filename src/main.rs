//! Incubator Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single fixed-rate control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink   NvsAdapter   Esp32Time  │
//! │  (Relay+Buttons+Probe)  (EventSink)    (Settings)   (Clock)    │
//! │  LogDisplay                                                    │
//! │  (DisplayPort)                                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Thermostat (pure logic)                   │    │
//! │  │  Debouncer · Setpoint · Sampler · Heater               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use incubator::adapters::console_display::LogDisplay;
use incubator::adapters::hardware::HardwareAdapter;
use incubator::adapters::log_sink::LogEventSink;
use incubator::adapters::nvs::NvsAdapter;
use incubator::adapters::time::Esp32TimeAdapter;
use incubator::app::ports::{ClockPort, ConfigPort};
use incubator::app::service::Thermostat;
use incubator::config::ThermostatConfig;
use incubator::drivers::gpio::{RawInput, RawOutput};
use incubator::drivers::hw_init;
use incubator::drivers::watchdog::Watchdog;
use incubator::pins;
use incubator::sensors::ntc::NtcProbe;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Incubator v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let mut nvs = NvsAdapter::new().map_err(incubator::Error::from)?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            ThermostatConfig::default()
        }
    };

    // ── 3. Initialise hardware peripherals ────────────────────
    hw_init::init_peripherals(config.buttons_active_low).map_err(incubator::Error::from)?;
    let watchdog = Watchdog::default();
    let clock = Esp32TimeAdapter::new();

    // ── 4. Construct adapters ─────────────────────────────────
    let probe = NtcProbe::new(|| hw_init::adc1_read(pins::PROBE_ADC_CHANNEL));
    let mut hw = HardwareAdapter::new(
        RawOutput::new(pins::HEATER_RELAY_GPIO),
        RawInput::new(pins::BUTTON_UP_GPIO),
        RawInput::new(pins::BUTTON_DOWN_GPIO),
        probe,
        config.buttons_active_low,
    );
    let mut log_sink = LogEventSink::new();
    let mut display = LogDisplay::new();

    // ── 5. Construct app service ──────────────────────────────
    let mut app = Thermostat::new(&config);
    if let Err(e) = app.start(clock.now_ms(), &mut nvs, &mut hw, &mut log_sink) {
        warn!("Setpoint storage unavailable ({}), continuing", e);
    }

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let period = std::time::Duration::from_millis(u64::from(config.control_loop_interval_ms));
    loop {
        watchdog.feed();
        app.tick(clock.now_ms(), &mut hw, &mut nvs, &mut log_sink);
        app.render_if_dirty(&mut display);
        std::thread::sleep(period);
    }
}
