//! Polled two-button debouncer with single-press and combined-hold gestures.
//!
//! ## Hardware
//!
//! Two momentary switches (Up / Down).  The control loop samples both raw
//! levels every tick and hands them to [`InputDebouncer::update`]; nothing
//! here blocks or waits.
//!
//! ## Gesture detection
//!
//! | Gesture        | Condition                                         | Event                       |
//! |----------------|---------------------------------------------------|-----------------------------|
//! | Single press   | Debounced press then release of one button alone  | `SinglePress(button)`       |
//! | Combined hold  | Both held continuously for `hold_ms`              | `CombinedHold`              |
//!
//! A raw level is accepted only after it has been stable for `debounce_ms`.
//! Once both buttons have been down together, neither release produces a
//! single press; an ambiguous dual press that ends before `hold_ms` produces
//! no event at all.  After a combined hold fires, it stays latched until both
//! buttons are released.

use crate::app::ports::Button;
use crate::config::ThermostatConfig;

/// Classified gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    SinglePress(Button),
    CombinedHold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Pressed,
    Released,
}

/// Stable-duration filter for one raw input.
#[derive(Debug, Clone, Copy)]
struct DebouncedLevel {
    stable: bool,
    raw: bool,
    raw_since_ms: u32,
}

impl DebouncedLevel {
    const fn new() -> Self {
        Self {
            stable: false,
            raw: false,
            raw_since_ms: 0,
        }
    }

    fn update(&mut self, raw: bool, now_ms: u32, debounce_ms: u32) -> Option<Edge> {
        if raw != self.raw {
            self.raw = raw;
            self.raw_since_ms = now_ms;
        }
        if self.raw == self.stable || now_ms.wrapping_sub(self.raw_since_ms) < debounce_ms {
            return None;
        }
        self.stable = self.raw;
        Some(if self.stable {
            Edge::Pressed
        } else {
            Edge::Released
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct ButtonState {
    level: DebouncedLevel,
    /// Held together with the other button since its last press.
    in_combo: bool,
    /// Single press waiting for [`InputDebouncer::single_press`].
    pending: bool,
}

impl ButtonState {
    const fn new() -> Self {
        Self {
            level: DebouncedLevel::new(),
            in_combo: false,
            pending: false,
        }
    }
}

pub struct InputDebouncer {
    up: ButtonState,
    down: ButtonState,
    debounce_ms: u32,
    hold_ms: u32,
    hold_started_ms: Option<u32>,
    /// Combined hold already fired; cleared once both buttons are up.
    hold_latched: bool,
    hold_pending: bool,
}

impl InputDebouncer {
    pub fn new(debounce_ms: u32, hold_ms: u32) -> Self {
        Self {
            up: ButtonState::new(),
            down: ButtonState::new(),
            debounce_ms,
            hold_ms,
            hold_started_ms: None,
            hold_latched: false,
            hold_pending: false,
        }
    }

    pub fn from_config(config: &ThermostatConfig) -> Self {
        Self::new(config.debounce_ms, config.combined_hold_ms)
    }

    /// Feed raw levels for this tick.  Returns at most one gesture.
    pub fn update(&mut self, now_ms: u32, up_raw: bool, down_raw: bool) -> Option<Gesture> {
        let up_edge = self.up.level.update(up_raw, now_ms, self.debounce_ms);
        let down_edge = self.down.level.update(down_raw, now_ms, self.debounce_ms);

        let up_held = self.up.level.stable;
        let down_held = self.down.level.stable;

        if up_held && down_held {
            self.up.in_combo = true;
            self.down.in_combo = true;
            if self.hold_started_ms.is_none() && !self.hold_latched {
                self.hold_started_ms = Some(now_ms);
            }
        } else {
            self.hold_started_ms = None;
            if !up_held && !down_held {
                self.hold_latched = false;
            }
        }

        if let Some(started) = self.hold_started_ms {
            if now_ms.wrapping_sub(started) >= self.hold_ms {
                self.hold_started_ms = None;
                self.hold_latched = true;
                self.hold_pending = true;
                return Some(Gesture::CombinedHold);
            }
        }

        let mut gesture = None;
        for (button, state, edge) in [
            (Button::Up, &mut self.up, up_edge),
            (Button::Down, &mut self.down, down_edge),
        ] {
            if edge != Some(Edge::Released) {
                continue;
            }
            if state.in_combo {
                state.in_combo = false;
            } else {
                state.pending = true;
                gesture = Some(Gesture::SinglePress(button));
            }
        }
        gesture
    }

    /// True at most once per clean press-and-release of `button`.
    pub fn single_press(&mut self, button: Button) -> bool {
        let state = match button {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
        };
        core::mem::take(&mut state.pending)
    }

    /// True once per completed dual hold.
    pub fn combined_hold(&mut self) -> bool {
        core::mem::take(&mut self.hold_pending)
    }
}
