//! In-memory frame buffer.
//!
//! Backs the terminal before the hardware buffer is mapped and in host tests.

use super::color::{Cell, Color, ColorCode};
use kestrel_hal::FrameBuffer;

/// Blank cell returned for reads outside the grid.
const BLANK: u16 = Cell::new(b' ', ColorCode::new(Color::LightGray, Color::Black)).encode();

/// A `W` x `H` grid of raw cells with a recorded cursor position.
pub struct TextGrid<const W: usize, const H: usize> {
    cells: [[u16; W]; H],
    cursor: (usize, usize),
}

impl<const W: usize, const H: usize> Default for TextGrid<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> TextGrid<W, H> {
    pub const fn new() -> Self {
        Self {
            cells: [[BLANK; W]; H],
            cursor: (0, 0),
        }
    }

    /// Glyph at (`x`, `y`), or a space outside the grid.
    pub fn glyph(&self, x: usize, y: usize) -> u8 {
        Cell::decode(self.read_cell(x, y)).glyph
    }

    /// Glyphs of row `y`.
    pub fn row(&self, y: usize) -> [u8; W] {
        let mut row = [b' '; W];
        for (x, glyph) in row.iter_mut().enumerate() {
            *glyph = self.glyph(x, y);
        }
        row
    }

    /// Last position passed to [`FrameBuffer::set_cursor_position`].
    pub fn hardware_cursor(&self) -> (usize, usize) {
        self.cursor
    }
}

impl<const W: usize, const H: usize> FrameBuffer for TextGrid<W, H> {
    fn width(&self) -> usize {
        W
    }

    fn height(&self) -> usize {
        H
    }

    fn read_cell(&self, x: usize, y: usize) -> u16 {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(BLANK)
    }

    fn write_cell(&mut self, x: usize, y: usize, cell: u16) {
        if let Some(slot) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    fn set_cursor_position(&mut self, x: usize, y: usize) {
        self.cursor = (x, y);
    }
}
