//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter           | Implements         | Connects to              |
//! |-------------------|--------------------|--------------------------|
//! | `console_display` | DisplayPort        | Serial log output        |
//! | `hardware`        | RelayPort          | Heater relay GPIO        |
//! |                   | ButtonPort         | Button GPIOs             |
//! |                   | TemperatureProbe   | NTC probe on ADC1        |
//! | `log_sink`        | EventSink          | Serial log output        |
//! | `nvs`             | SettingsStorage    | NVS / in-memory store    |
//! |                   | ConfigPort         |                          |
//! | `time`            | ClockPort          | ESP32 system timer       |

pub mod console_display;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
