//! NTC thermistor probe (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via an
//! ADC channel.  The simplified Beta (Steinhart-Hart) equation converts
//! resistance to temperature.
//!
//! An open or shorted probe pins the divider to a rail; both are reported
//! as [`PROBE_DISCONNECTED_C`], as is a failed ADC read.
//!
//! ## Dual-target design
//!
//! The raw ADC sample comes from a closure supplied at construction.  On
//! ESP-IDF `main` passes a oneshot ADC read; on host/test [`sim_adc`] reads
//! from a static AtomicU16 for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::app::ports::{PROBE_DISCONNECTED_C, TemperatureProbe};

static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(2048);

/// Inject the raw ADC value returned by [`sim_adc`].
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

/// Host-side ADC source backed by [`sim_set_temp_adc`].
pub fn sim_adc() -> Option<u16> {
    Some(SIM_TEMP_ADC.load(Ordering::Relaxed))
}

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
/// Divider voltages this close to a rail mean open/short circuit.
const RAIL_MARGIN_V: f32 = 0.01;

pub struct NtcProbe<F> {
    read_adc: F,
}

impl<F> NtcProbe<F>
where
    F: FnMut() -> Option<u16>,
{
    pub fn new(read_adc: F) -> Self {
        Self { read_adc }
    }

    fn adc_to_celsius(raw: u16) -> f32 {
        let voltage = (raw as f32 / ADC_MAX) * V_REF;
        if voltage <= RAIL_MARGIN_V || voltage >= (V_REF - RAIL_MARGIN_V) {
            return PROBE_DISCONNECTED_C;
        }
        let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
        let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
        if inv_t <= 0.0 {
            return PROBE_DISCONNECTED_C;
        }
        (1.0 / inv_t) - 273.15
    }
}

impl<F> TemperatureProbe for NtcProbe<F>
where
    F: FnMut() -> Option<u16>,
{
    fn request_reading(&mut self) -> f32 {
        match (self.read_adc)() {
            Some(raw) => Self::adc_to_celsius(raw),
            None => {
                log::warn!("NTC: ADC read failed");
                PROBE_DISCONNECTED_C
            }
        }
    }
}
