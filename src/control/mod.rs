//! Control logic: the two-regime heater controller and the persisted
//! setpoint.

pub mod heater;
pub mod setpoint;
