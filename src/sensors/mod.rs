//! Sensor subsystem — the interval-gated [`TemperatureSampler`] and the
//! concrete probe driver behind [`TemperatureProbe`](crate::app::ports::TemperatureProbe).

pub mod ntc;
pub mod sampler;

pub use sampler::{TemperatureReading, TemperatureSampler};
