//! Presentation model consumed by [`DisplayPort`](crate::app::ports::DisplayPort).
//!
//! The core publishes a [`DisplayFrame`] plus [`DirtyFlags`] naming the
//! fields that changed; adapters redraw only those.  [`TextLayout`] is the
//! fixed 20x4 character arrangement used by the character-LCD and console
//! adapters:
//!
//! ```text
//! ┌────────────────────┐
//! │Temp: 37.4C         │
//! │Heater: ON          │
//! │Set:  37.5C         │
//! │Up: 2d 03:14:07     │
//! └────────────────────┘
//! ```

use core::fmt::Write;

use heapless::String;

use crate::control::heater::HeaterState;

/// Display width in characters.
pub const COLUMNS: usize = 20;

pub type Line = String<COLUMNS>;

/// Which parts of the frame changed since the last refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub temperature: bool,
    pub setpoint: bool,
    pub heater: bool,
    pub clock: bool,
}

impl DirtyFlags {
    pub const ALL: Self = Self {
        temperature: true,
        setpoint: true,
        heater: true,
        clock: true,
    };

    pub fn any(&self) -> bool {
        self.temperature || self.setpoint || self.heater || self.clock
    }
}

/// Elapsed time since boot, split for the clock line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uptime {
    pub days: u32,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Uptime {
    pub fn from_secs(total: u64) -> Self {
        Self {
            days: (total / 86_400) as u32,
            hours: ((total / 3_600) % 24) as u8,
            minutes: ((total / 60) % 60) as u8,
            seconds: (total % 60) as u8,
        }
    }
}

/// Snapshot of everything the presentation layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayFrame {
    /// `None` until the first sample.
    pub current_c: Option<f32>,
    pub setpoint_c: f32,
    pub heater: HeaterState,
    pub uptime: Uptime,
    pub sensor_fault: bool,
}

/// Fixed four-line text rendering of a [`DisplayFrame`].
pub struct TextLayout;

impl TextLayout {
    pub const TEMPERATURE_ROW: usize = 0;
    pub const HEATER_ROW: usize = 1;
    pub const SETPOINT_ROW: usize = 2;
    pub const CLOCK_ROW: usize = 3;

    pub fn temperature_line(frame: &DisplayFrame) -> Line {
        let mut line = Line::new();
        // Overlong output is truncated by the fixed-capacity buffer.
        let _ = match frame.current_c {
            _ if frame.sensor_fault => write!(line, "Temp: PROBE FAULT"),
            Some(c) => write!(line, "Temp: {:.1}C", c),
            None => write!(line, "Temp: --.-C"),
        };
        line
    }

    pub fn heater_line(frame: &DisplayFrame) -> Line {
        let mut line = Line::new();
        let _ = write!(
            line,
            "Heater: {}",
            if frame.heater.is_on() { "ON" } else { "OFF" }
        );
        line
    }

    pub fn setpoint_line(frame: &DisplayFrame) -> Line {
        let mut line = Line::new();
        let _ = write!(line, "Set:  {:.1}C", frame.setpoint_c);
        line
    }

    pub fn clock_line(frame: &DisplayFrame) -> Line {
        let u = frame.uptime;
        let mut line = Line::new();
        let _ = write!(
            line,
            "Up: {}d {:02}:{:02}:{:02}",
            u.days, u.hours, u.minutes, u.seconds
        );
        line
    }

    /// Rows to redraw for `dirty`, as `(row, text)`.
    pub fn dirty_lines(frame: &DisplayFrame, dirty: DirtyFlags) -> heapless::Vec<(usize, Line), 4> {
        let mut rows = heapless::Vec::new();
        // Capacity 4 matches the four flags; pushes cannot fail.
        if dirty.temperature {
            let _ = rows.push((Self::TEMPERATURE_ROW, Self::temperature_line(frame)));
        }
        if dirty.heater {
            let _ = rows.push((Self::HEATER_ROW, Self::heater_line(frame)));
        }
        if dirty.setpoint {
            let _ = rows.push((Self::SETPOINT_ROW, Self::setpoint_line(frame)));
        }
        if dirty.clock {
            let _ = rows.push((Self::CLOCK_ROW, Self::clock_line(frame)));
        }
        rows
    }
}
