//! Console display adapter.
//!
//! Implements [`DisplayPort`] by logging the dirty rows of the 20x4
//! [`TextLayout`].  Used on boards without a character LCD and on host,
//! where it also keeps a copy of the screen for inspection.

use log::info;

use crate::app::ports::DisplayPort;
use crate::display::{DirtyFlags, DisplayFrame, Line, TextLayout};

pub struct LogDisplay {
    rows: [Line; 4],
    refreshes: u32,
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            rows: Default::default(),
            refreshes: 0,
        }
    }

    /// Current text of `row` (0..4).
    pub fn row(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|l| l.as_str())
    }

    /// Number of `render` calls that redrew at least one row.
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }
}

impl DisplayPort for LogDisplay {
    fn render(&mut self, frame: &DisplayFrame, dirty: DirtyFlags) {
        let lines = TextLayout::dirty_lines(frame, dirty);
        if lines.is_empty() {
            return;
        }
        for (row, text) in lines {
            info!("LCD{} | {}", row, text);
            self.rows[row] = text;
        }
        self.refreshes += 1;
    }
}
