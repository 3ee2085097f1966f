use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of rows on the board
    pub rows: usize,
    /// Number of columns on the board
    pub cols: usize,
    /// Fixed tick period in milliseconds, shared by the timer and the interpolator
    pub tick_ms: u64,
    /// Size of one cell in virtual pixels
    pub cell_size: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            tick_ms: 140,
            cell_size: 8.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
