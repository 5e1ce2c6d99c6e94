//! Interval-gated temperature sampling.
//!
//! The sampler owns the only copy of the latest reading.  A request is sent
//! to the probe at most once per `interval_ms`; the first poll after boot
//! samples immediately.  The sample time is recorded whether or not the
//! probe answered with a plausible value, so a dead probe is not hammered.

use crate::app::ports::TemperatureProbe;
use crate::config::ThermostatConfig;

/// One probe sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub celsius: f32,
    pub taken_at_ms: u32,
    /// Outside the plausible range (disconnected probe, bus error, …).
    pub fault: bool,
}

pub struct TemperatureSampler {
    interval_ms: u32,
    plausible_min_c: f32,
    plausible_max_c: f32,
    last_sample_ms: Option<u32>,
    latest: Option<TemperatureReading>,
}

impl TemperatureSampler {
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            interval_ms: config.sample_interval_ms,
            plausible_min_c: config.plausible_min_c,
            plausible_max_c: config.plausible_max_c,
            last_sample_ms: None,
            latest: None,
        }
    }

    /// Sample the probe if the interval has elapsed.  Returns the fresh
    /// reading, or `None` with state unchanged.
    pub fn poll(&mut self, now_ms: u32, probe: &mut impl TemperatureProbe) -> Option<TemperatureReading> {
        if let Some(last) = self.last_sample_ms {
            if now_ms.wrapping_sub(last) < self.interval_ms {
                return None;
            }
        }
        self.last_sample_ms = Some(now_ms);

        let celsius = probe.request_reading();
        let reading = TemperatureReading {
            celsius,
            taken_at_ms: now_ms,
            fault: !self.is_plausible(celsius),
        };
        self.latest = Some(reading);
        Some(reading)
    }

    /// Most recent reading; `None` until the first sample.
    pub fn latest(&self) -> Option<TemperatureReading> {
        self.latest
    }

    fn is_plausible(&self, celsius: f32) -> bool {
        (self.plausible_min_c..=self.plausible_max_c).contains(&celsius)
    }
}
