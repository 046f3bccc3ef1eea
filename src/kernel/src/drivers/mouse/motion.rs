//! Pointer motion: relative deltas to a smoothed, clamped cell position.
//!
//! Positions are kept in Q8 fixed point (1 cell = 256 units) so the
//! exponential filter can move by fractions of a cell between packets.

use crate::config::Smoothing;

const FRACTION_BITS: u32 = 8;
const ONE: i32 = 1 << FRACTION_BITS;

/// Exponential smoothing filter over Q8 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smoother {
    factor: Smoothing,
}

impl Smoother {
    pub const fn new(factor: Smoothing) -> Self {
        Self { factor }
    }

    /// Moves `current` a fraction of the way toward `target`.
    ///
    /// The step never exceeds the remaining distance and is at least one Q8
    /// unit while the two differ, so repeated calls reach `target` without
    /// passing it.
    pub fn step(&self, current: i32, target: i32) -> i32 {
        let distance = target - current;
        if distance == 0 {
            return current;
        }
        let mut step = distance * self.factor.numerator / self.factor.denominator;
        if step == 0 {
            step = distance.signum();
        }
        current + step
    }
}

/// Smoothed pointer position bounded to the text grid.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    x: i32,
    y: i32,
    max_x: i32,
    max_y: i32,
    smoother: Smoother,
}

impl MotionTracker {
    /// Creates a tracker at `start`, bounded to `[0, bounds.0) x [0, bounds.1)`.
    pub const fn new(start: (u16, u16), bounds: (u16, u16), smoothing: Smoothing) -> Self {
        let max_x = last_cell(bounds.0);
        let max_y = last_cell(bounds.1);
        Self {
            x: clamp(start.0 as i32 * ONE, max_x),
            y: clamp(start.1 as i32 * ONE, max_y),
            max_x,
            max_y,
            smoother: Smoother::new(smoothing),
        }
    }

    /// Current position in cells.
    pub fn position(&self) -> (u16, u16) {
        ((self.x >> FRACTION_BITS) as u16, (self.y >> FRACTION_BITS) as u16)
    }

    /// Screen-space target for a device delta, in cells, before smoothing.
    ///
    /// Device Y grows upward, screen rows grow downward.
    pub fn target(&self, dx: i16, dy: i16) -> (i32, i32) {
        let (x, y) = self.target_fixed(dx, dy);
        (x >> FRACTION_BITS, y >> FRACTION_BITS)
    }

    fn target_fixed(&self, dx: i16, dy: i16) -> (i32, i32) {
        (
            self.x + i32::from(dx) * ONE,
            self.y - i32::from(dy) * ONE,
        )
    }

    /// Applies one packet's movement and returns the new cell position.
    pub fn apply(&mut self, dx: i16, dy: i16) -> (u16, u16) {
        let (target_x, target_y) = self.target_fixed(dx, dy);
        self.x = clamp(self.smoother.step(self.x, target_x), self.max_x);
        self.y = clamp(self.smoother.step(self.y, target_y), self.max_y);
        self.position()
    }
}

const fn last_cell(extent: u16) -> i32 {
    if extent == 0 {
        0
    } else {
        (extent as i32 - 1) * ONE
    }
}

const fn clamp(value: i32, max: i32) -> i32 {
    if value < 0 {
        0
    } else if value > max {
        max
    } else {
        value
    }
}
