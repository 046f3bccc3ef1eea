//! Blocking line input.
//!
//! [`LineEditor`] is the READING -> {DONE, ABORTED} state machine; the
//! [`Terminal::read_line`] family drives it from a [`CharSource`].

use super::Terminal;
use crate::drivers::keyboard::ESCAPE_SENTINEL;
use kestrel_hal::FrameBuffer;

/// Blocking supplier of decoded characters.
pub trait CharSource {
    /// Blocks until a character is available.
    fn read_char(&mut self) -> u8;

    /// Returns a character if one is already waiting.
    fn try_char(&mut self) -> Option<u8> {
        None
    }

    /// Acknowledges an ESC abort.
    fn clear_exit_request(&mut self) {}
}

impl<T: CharSource + ?Sized> CharSource for &mut T {
    fn read_char(&mut self) -> u8 {
        (**self).read_char()
    }

    fn try_char(&mut self) -> Option<u8> {
        (**self).try_char()
    }

    fn clear_exit_request(&mut self) {
        (**self).clear_exit_request()
    }
}

/// Editor state after one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Reading,
    Done,
    Aborted,
}

/// Result of a completed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Enter pressed; the line is the first `n` bytes of the buffer.
    Done(usize),
    /// ESC pressed; the buffer was cleared and the echo erased.
    Aborted,
}

impl LineOutcome {
    /// Length of the line, zero when aborted.
    pub fn len(&self) -> usize {
        match *self {
            LineOutcome::Done(len) => len,
            LineOutcome::Aborted => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The line as text.
    pub fn text<'b>(&self, buf: &'b [u8]) -> &'b str {
        let end = self.len().min(buf.len());
        core::str::from_utf8(&buf[..end]).unwrap_or("")
    }
}

/// Cursor position when the editor was created.
#[derive(Debug, Clone, Copy)]
struct Origin {
    x: usize,
    y: usize,
    /// Terminal scroll count at entry, so the row can follow the text up
    /// the screen.
    scrolls: usize,
}

impl Origin {
    fn capture<F: FrameBuffer>(terminal: &Terminal<F>) -> Self {
        let (x, y) = terminal.cursor();
        Self {
            x,
            y,
            scrolls: terminal.scroll_count(),
        }
    }

    /// Row of the origin now, or `None` once it scrolled off the top.
    fn row<F: FrameBuffer>(&self, terminal: &Terminal<F>) -> Option<usize> {
        let scrolled = terminal.scroll_count().wrapping_sub(self.scrolls);
        self.y.checked_sub(scrolled)
    }
}

/// Line editing state machine over a caller-provided buffer.
pub struct LineEditor<'b> {
    buf: &'b mut [u8],
    len: usize,
    origin: Origin,
    /// Column backspace never crosses on the origin row.
    bound: Option<usize>,
    state: EditorState,
}

impl<'b> LineEditor<'b> {
    /// Editor protecting everything before the terminal's current cursor.
    pub fn unbounded<F: FrameBuffer>(terminal: &Terminal<F>, buf: &'b mut [u8]) -> Self {
        Self::new(terminal, buf, None)
    }

    /// Editor protecting columns left of `bound` on the current row.
    pub fn bounded<F: FrameBuffer>(
        terminal: &Terminal<F>,
        buf: &'b mut [u8],
        bound: usize,
    ) -> Self {
        Self::new(terminal, buf, Some(bound))
    }

    fn new<F: FrameBuffer>(
        terminal: &Terminal<F>,
        buf: &'b mut [u8],
        bound: Option<usize>,
    ) -> Self {
        Self {
            buf,
            len: 0,
            origin: Origin::capture(terminal),
            bound,
            state: EditorState::Reading,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Bytes accepted so far.
    pub fn line(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Processes one character and returns the new state.
    ///
    /// Once the editor has left READING further input is ignored.
    pub fn feed<F: FrameBuffer>(&mut self, terminal: &mut Terminal<F>, ch: u8) -> EditorState {
        if self.state != EditorState::Reading {
            return self.state;
        }
        match ch {
            ESCAPE_SENTINEL => {
                // every accepted byte occupies one cell, so this walks back
                // to the origin even across wrapped rows
                while self.len > 0 {
                    self.len -= 1;
                    terminal.ungetchar();
                }
                self.buf.fill(0);
                self.state = EditorState::Aborted;
            }
            b'\n' => {
                terminal.newline();
                self.state = EditorState::Done;
            }
            0x08 | 0x7F => {
                if self.len > 0 && self.past_boundary(terminal) {
                    self.erase(terminal);
                }
            }
            32..=126 => {
                if self.len < self.buf.len() {
                    self.buf[self.len] = ch;
                    self.len += 1;
                    terminal.put_char(ch);
                }
            }
            _ => {}
        }
        self.state
    }

    fn on_origin_row<F: FrameBuffer>(&self, terminal: &Terminal<F>) -> bool {
        self.origin.row(terminal) == Some(terminal.cursor().1)
    }

    fn past_boundary<F: FrameBuffer>(&self, terminal: &Terminal<F>) -> bool {
        let (x, y) = terminal.cursor();
        match (self.bound, self.origin.row(terminal)) {
            (Some(bound), Some(row)) if row == y => x > bound,
            // wrapped rows below the origin hold only typed text
            (Some(_), _) => true,
            (None, Some(row)) => (y, x) > (row, self.origin.x),
            // origin scrolled off the top
            (None, None) => (y, x) > (0, 0),
        }
    }

    fn erase<F: FrameBuffer>(&mut self, terminal: &mut Terminal<F>) {
        self.len -= 1;
        self.buf[self.len] = 0;
        match self.bound {
            Some(bound) if self.on_origin_row(terminal) => terminal.ungetchar_bound(bound),
            _ => terminal.ungetchar(),
        }
    }
}

impl<F: FrameBuffer> Terminal<F> {
    /// Reads a line, echoing it at the cursor.
    ///
    /// Backspace never erases past the cursor position at entry. ESC erases
    /// the echo, clears the exit request on `src` and returns
    /// [`LineOutcome::Aborted`]. Characters beyond the buffer's capacity are
    /// dropped.
    pub fn read_line(&mut self, src: &mut impl CharSource, buf: &mut [u8]) -> LineOutcome {
        let mut editor = LineEditor::unbounded(self, buf);
        self.drive(&mut editor, src)
    }

    /// Like [`Terminal::read_line`], but backspace stops at column `bound`.
    pub fn read_line_bound(
        &mut self,
        src: &mut impl CharSource,
        buf: &mut [u8],
        bound: usize,
    ) -> LineOutcome {
        let mut editor = LineEditor::bounded(self, buf, bound);
        self.drive(&mut editor, src)
    }

    fn drive(&mut self, editor: &mut LineEditor<'_>, src: &mut impl CharSource) -> LineOutcome {
        loop {
            self.sync_cursor();
            match editor.feed(self, src.read_char()) {
                EditorState::Reading => {}
                EditorState::Done => return LineOutcome::Done(editor.len),
                EditorState::Aborted => {
                    src.clear_exit_request();
                    return LineOutcome::Aborted;
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted keys, then ESC forever.
    pub struct ScriptedKeys {
        pending: VecDeque<u8>,
        pub exit_cleared: usize,
    }

    impl ScriptedKeys {
        pub fn new(keys: &[u8]) -> Self {
            Self {
                pending: keys.iter().copied().collect(),
                exit_cleared: 0,
            }
        }
    }

    impl CharSource for ScriptedKeys {
        fn read_char(&mut self) -> u8 {
            self.pending.pop_front().unwrap_or(ESCAPE_SENTINEL)
        }

        fn try_char(&mut self) -> Option<u8> {
            Some(self.read_char())
        }

        fn clear_exit_request(&mut self) {
            self.exit_cleared += 1;
        }
    }
}
