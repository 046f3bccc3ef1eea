//! Text console on top of a [`FrameBuffer`].
//!
//! The terminal addresses cells through a [`Viewport`]: the whole usable
//! screen, or a bordered window inside it. All coordinates passed to and
//! returned from [`Terminal`] are viewport-relative.
//!
//! The cursor column may equal the viewport width; that means a wrap is
//! pending and the next glyph starts a new line.

pub mod color;
pub mod format;
pub mod grid;
pub mod line;

pub use color::{Cell, Color, ColorCode};
pub use format::Arg;
pub use grid::TextGrid;
pub use line::{CharSource, EditorState, LineEditor, LineOutcome};

use crate::config::{display, window};
use core::fmt;
use kestrel_hal::FrameBuffer;

/// Glyph shown for bytes that have no printable form.
const PLACEHOLDER: u8 = 0xFE;

/// Rectangle of the frame buffer the terminal draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub origin_x: usize,
    pub origin_y: usize,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    /// The usable screen.
    pub const FULL: Viewport = Viewport::new(0, 0, display::WIDTH, display::HEIGHT);

    /// The bordered window.
    pub const BOXED: Viewport = Viewport::new(
        window::ORIGIN_X,
        window::ORIGIN_Y,
        window::WIDTH,
        window::HEIGHT,
    );

    pub const fn new(origin_x: usize, origin_y: usize, width: usize, height: usize) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Shrinks the viewport to fit a `width` x `height` buffer, keeping at
    /// least one cell.
    fn fit(self, width: usize, height: usize) -> Self {
        let origin_x = self.origin_x.min(width.saturating_sub(1));
        let origin_y = self.origin_y.min(height.saturating_sub(1));
        Self {
            origin_x,
            origin_y,
            width: self.width.min(width - origin_x.min(width)).max(1),
            height: self.height.min(height - origin_y.min(height)).max(1),
        }
    }
}

/// Cursor-tracking text terminal.
pub struct Terminal<F: FrameBuffer> {
    fb: F,
    viewport: Viewport,
    x: usize,
    y: usize,
    colors: ColorCode,
    scrolls: usize,
}

impl<F: FrameBuffer> Terminal<F> {
    /// Wraps `fb`. Contents are left as they are; the cursor starts at (0, 0).
    pub fn new(fb: F, viewport: Viewport) -> Self {
        let viewport = viewport.fit(fb.width(), fb.height());
        Self {
            fb,
            viewport,
            x: 0,
            y: 0,
            colors: ColorCode::new(Color::White, Color::Black),
            scrolls: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Switches to another viewport and homes the cursor.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.fit(self.fb.width(), self.fb.height());
        self.x = 0;
        self.y = 0;
        self.sync_cursor();
    }

    pub fn frame_buffer(&self) -> &F {
        &self.fb
    }

    /// Current cursor position.
    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Number of times the viewport has scrolled.
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }

    pub fn colors(&self) -> ColorCode {
        self.colors
    }

    /// Sets the colors used by subsequent output.
    pub fn set_colors(&mut self, foreground: Color, background: Color) {
        self.colors = ColorCode::new(foreground, background);
    }

    /// Decoded cell at (`x`, `y`).
    pub fn cell_at(&self, x: usize, y: usize) -> Cell {
        Cell::decode(self.fb.read_cell(self.viewport.origin_x + x, self.viewport.origin_y + y))
    }

    /// Writes `cell` at (`x`, `y`) without moving the cursor.
    pub fn put_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.viewport.width && y < self.viewport.height {
            self.write(x, y, cell);
        }
    }

    fn write(&mut self, x: usize, y: usize, cell: Cell) {
        self.fb.write_cell(
            self.viewport.origin_x + x,
            self.viewport.origin_y + y,
            cell.encode(),
        );
    }

    fn blank(&self) -> Cell {
        Cell::new(b' ', self.colors)
    }

    /// Pushes the cursor to the hardware indicator.
    pub fn sync_cursor(&mut self) {
        self.fb.set_cursor_position(
            self.viewport.origin_x + self.x,
            self.viewport.origin_y + self.y,
        );
    }

    /// Blanks the viewport in the given colors and homes the cursor.
    ///
    /// The colors used for later output are not changed.
    pub fn clear(&mut self, foreground: Color, background: Color) {
        let blank = Cell::new(b' ', ColorCode::new(foreground, background));
        for y in 0..self.viewport.height {
            for x in 0..self.viewport.width {
                self.write(x, y, blank);
            }
        }
        self.x = 0;
        self.y = 0;
        self.sync_cursor();
    }

    /// Moves to the start of the next row, scrolling on the last one.
    pub fn newline(&mut self) {
        let last = self.viewport.height - 1;
        if self.y >= last {
            self.scroll();
            self.y = last;
        } else {
            self.y += 1;
        }
        self.x = 0;
        self.sync_cursor();
    }

    fn scroll(&mut self) {
        let Viewport {
            origin_x,
            origin_y,
            width,
            height,
        } = self.viewport;
        for y in 1..height {
            for x in 0..width {
                let cell = self.fb.read_cell(origin_x + x, origin_y + y);
                self.fb.write_cell(origin_x + x, origin_y + y - 1, cell);
            }
        }
        let blank = self.blank();
        for x in 0..width {
            self.write(x, height - 1, blank);
        }
        self.scrolls = self.scrolls.wrapping_add(1);
    }

    /// Writes one glyph at the cursor. `\n` starts a new line.
    pub fn put_char(&mut self, ch: u8) {
        if ch == b'\n' {
            self.newline();
            return;
        }
        if self.x >= self.viewport.width {
            self.newline();
        }
        let cell = Cell::new(ch, self.colors);
        self.write(self.x, self.y, cell);
        self.x += 1;
        self.sync_cursor();
    }

    pub fn put_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.put_char(byte);
        }
    }

    /// Moves the cursor, clamping into the viewport.
    pub fn goto(&mut self, x: usize, y: usize) {
        self.x = x.min(self.viewport.width - 1);
        self.y = y.min(self.viewport.height - 1);
        self.sync_cursor();
    }

    /// Steps back one cell and blanks it, wrapping to the end of the
    /// previous row from column 0.
    pub fn ungetchar(&mut self) {
        if self.x > 0 {
            self.x -= 1;
        } else if self.y > 0 {
            self.y -= 1;
            self.x = self.viewport.width - 1;
        } else {
            return;
        }
        let blank = self.blank();
        self.write(self.x, self.y, blank);
        self.sync_cursor();
    }

    /// Steps back one cell and blanks it, never moving left of `bound`.
    pub fn ungetchar_bound(&mut self, bound: usize) {
        if self.x > bound {
            self.x -= 1;
            let blank = self.blank();
            self.write(self.x, self.y, blank);
            self.sync_cursor();
        }
    }

    /// Formats `fmt` with `args` at the cursor. See [`format`].
    pub fn printf(&mut self, fmt: &str, args: &[Arg<'_>]) {
        format::render(fmt, args, |byte| self.put_char(byte));
    }

    /// Draws a border just outside the viewport in `colors`.
    ///
    /// Does nothing when the viewport touches the buffer edge.
    pub fn draw_frame(&mut self, colors: ColorCode) {
        let Viewport {
            origin_x,
            origin_y,
            width,
            height,
        } = self.viewport;
        let (Some(left), Some(top)) = (origin_x.checked_sub(1), origin_y.checked_sub(1)) else {
            return;
        };
        let right = origin_x + width;
        let bottom = origin_y + height;
        if right >= self.fb.width() || bottom >= self.fb.height() {
            return;
        }

        let horizontal = Cell::new(window::BORDER_HORIZONTAL, colors).encode();
        let vertical = Cell::new(window::BORDER_VERTICAL, colors).encode();
        let corner = Cell::new(window::BORDER_CORNER, colors).encode();

        for x in origin_x..right {
            self.fb.write_cell(x, top, horizontal);
            self.fb.write_cell(x, bottom, horizontal);
        }
        for y in origin_y..bottom {
            self.fb.write_cell(left, y, vertical);
            self.fb.write_cell(right, y, vertical);
        }
        for (x, y) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            self.fb.write_cell(x, y, corner);
        }
    }
}

impl<F: FrameBuffer> fmt::Write for Terminal<F> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            match byte {
                0x20..=0x7e | b'\n' => self.put_char(byte),
                _ => self.put_char(PLACEHOLDER),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    type Grid = TextGrid<80, 24>;

    fn terminal() -> Terminal<Grid> {
        Terminal::new(Grid::new(), Viewport::FULL)
    }

    fn row(term: &Terminal<Grid>, y: usize) -> std::string::String {
        term.frame_buffer().row(y).iter().map(|&b| b as char).collect()
    }

    #[test]
    fn test_put_char_advances_and_moves_hardware_cursor() {
        let mut term = terminal();
        term.put_str("ABC");
        assert_eq!(term.cursor(), (3, 0));
        assert_eq!(term.frame_buffer().hardware_cursor(), (3, 0));
        assert_eq!(term.cell_at(1, 0).glyph, b'B');
        assert_eq!(term.cell_at(1, 0).colors, term.colors());
    }

    #[test]
    fn test_ungetchar_blanks_last_cell() {
        let mut term = terminal();
        term.put_str("ABC");
        term.ungetchar();
        assert_eq!(term.cursor(), (2, 0));
        assert!(row(&term, 0).starts_with("AB "));
    }

    #[test]
    fn test_ungetchar_wraps_to_previous_row() {
        let mut term = terminal();
        term.put_str("x\ny");
        term.ungetchar();
        term.ungetchar();
        assert_eq!(term.cursor(), (79, 0));
        term.goto(0, 0);
        term.ungetchar();
        assert_eq!(term.cursor(), (0, 0));
    }

    #[test]
    fn test_ungetchar_bound_stops_at_bound() {
        let mut term = terminal();
        term.put_str("abcdef");
        term.ungetchar_bound(4);
        term.ungetchar_bound(4);
        term.ungetchar_bound(4);
        assert_eq!(term.cursor(), (4, 0));
        assert!(row(&term, 0).starts_with("abcd  "));
    }

    #[test]
    fn test_wrap_is_deferred_until_next_glyph() {
        let mut term = terminal();
        for _ in 0..80 {
            term.put_char(b'-');
        }
        assert_eq!(term.cursor(), (80, 0));
        term.put_char(b'+');
        assert_eq!(term.cursor(), (1, 1));
        assert_eq!(term.cell_at(0, 1).glyph, b'+');
    }

    #[test]
    fn test_newlines_scroll_rows_up() {
        let mut term = terminal();
        for y in 0..24u8 {
            term.goto(0, usize::from(y));
            term.put_char(b'a' + y);
        }
        term.goto(0, 23);
        term.newline();
        assert_eq!(term.scroll_count(), 1);
        assert_eq!(term.cursor(), (0, 23));
        assert_eq!(term.cell_at(0, 0).glyph, b'b');
        assert_eq!(term.cell_at(0, 22).glyph, b'a' + 23);
        assert_eq!(term.cell_at(0, 23).glyph, b' ');
    }

    #[test]
    fn test_height_newlines_push_out_first_row() {
        let mut term = terminal();
        term.put_str("first");
        for _ in 0..24 {
            term.newline();
        }
        for y in 0..24 {
            assert!(!row(&term, y).contains("first"));
        }
    }

    #[test]
    fn test_row_moves_up_by_one_per_scroll() {
        let mut term = terminal();
        term.goto(0, 23);
        term.put_str("marker");
        term.newline();
        assert!(row(&term, 22).starts_with("marker"));
        term.newline();
        assert!(row(&term, 21).starts_with("marker"));
    }

    #[test]
    fn test_goto_clamps() {
        let mut term = terminal();
        term.goto(500, 500);
        assert_eq!(term.cursor(), (79, 23));
        assert_eq!(term.frame_buffer().hardware_cursor(), (79, 23));
    }

    #[test]
    fn test_clear_uses_given_colors() {
        let mut term = terminal();
        term.put_str("junk");
        term.clear(Color::Yellow, Color::Blue);
        assert_eq!(term.cursor(), (0, 0));
        let cell = term.cell_at(40, 12);
        assert_eq!(cell.glyph, b' ');
        assert_eq!(cell.colors, ColorCode::new(Color::Yellow, Color::Blue));
        assert_eq!(term.colors(), ColorCode::new(Color::White, Color::Black));
    }

    #[test]
    fn test_boxed_viewport_is_offset() {
        let mut term = Terminal::new(Grid::new(), Viewport::BOXED);
        term.put_char(b'Q');
        assert_eq!(term.frame_buffer().glyph(5, 2), b'Q');
        assert_eq!(term.frame_buffer().hardware_cursor(), (6, 2));
        term.goto(100, 100);
        assert_eq!(term.cursor(), (69, 19));
    }

    #[test]
    fn test_boxed_scroll_leaves_outside_untouched() {
        let mut grid = Grid::new();
        grid.write_cell(0, 3, Cell::new(b'#', ColorCode::new(Color::White, Color::Black)).encode());
        let mut term = Terminal::new(grid, Viewport::BOXED);
        term.goto(0, 1);
        term.put_str("keep");
        term.goto(0, 19);
        term.newline();
        assert_eq!(term.cell_at(0, 0).glyph, b'k');
        assert_eq!(term.frame_buffer().glyph(0, 3), b'#');
    }

    #[test]
    fn test_draw_frame_around_box() {
        let mut term = Terminal::new(Grid::new(), Viewport::BOXED);
        term.draw_frame(ColorCode::new(Color::LightCyan, Color::Black));
        let fb = term.frame_buffer();
        assert_eq!(fb.glyph(4, 1), b'+');
        assert_eq!(fb.glyph(75, 22), b'+');
        assert_eq!(fb.glyph(10, 1), b'-');
        assert_eq!(fb.glyph(10, 22), b'-');
        assert_eq!(fb.glyph(4, 10), b'|');
        assert_eq!(fb.glyph(75, 10), b'|');
        assert_eq!(fb.glyph(5, 2), b' ');
    }

    #[test]
    fn test_draw_frame_skips_full_screen() {
        let mut term = terminal();
        term.draw_frame(ColorCode::new(Color::White, Color::Black));
        assert_eq!(term.frame_buffer().glyph(0, 0), b' ');
    }

    #[test]
    fn test_printf_writes_at_cursor() {
        let mut term = terminal();
        term.printf("x=%d y=%02d", &[Arg::Int(7), Arg::Int(3)]);
        assert!(row(&term, 0).starts_with("x=7 y=03"));
    }

    #[test]
    fn test_fmt_write_replaces_unprintable() {
        let mut term = terminal();
        write!(term, "a\u{7}b").expect("terminal writes never fail");
        assert_eq!(term.cell_at(0, 0).glyph, b'a');
        assert_eq!(term.cell_at(1, 0).glyph, PLACEHOLDER);
        assert_eq!(term.cell_at(2, 0).glyph, b'b');
    }

    #[test]
    fn test_viewport_fits_small_buffer() {
        let term: Terminal<TextGrid<10, 4>> = Terminal::new(TextGrid::new(), Viewport::BOXED);
        assert_eq!(term.viewport(), Viewport::new(5, 2, 5, 2));
    }
}
