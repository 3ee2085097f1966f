//! Drag gestures turned into direction changes
//!
//! A drag emits a turn once it has travelled further than the threshold along
//! its dominant axis, then re-anchors at the current pointer position so one
//! continuous drag can steer several times.

use crate::game::Direction;

/// Minimum drag distance, in pixels, before a turn is emitted
pub const SWIPE_THRESHOLD: f64 = 36.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SwipeTracker {
    threshold: f64,
    origin: Option<(f64, f64)>,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            origin: None,
        }
    }

    /// Pointer pressed
    pub fn begin(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
    }

    /// Pointer moved while pressed
    pub fn track(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (start_x, start_y) = self.origin?;
        let (dx, dy) = (x - start_x, y - start_y);

        let direction = if dx.abs() > dy.abs() {
            if dx > self.threshold {
                Some(Direction::Right)
            } else if dx < -self.threshold {
                Some(Direction::Left)
            } else {
                None
            }
        } else if dy > self.threshold {
            Some(Direction::Down)
        } else if dy < -self.threshold {
            Some(Direction::Up)
        } else {
            None
        };

        if direction.is_some() {
            self.origin = Some((x, y));
        }
        direction
    }

    /// Pointer released; returns whether a gesture was in progress
    pub fn end(&mut self) -> bool {
        self.origin.take().is_some()
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}
