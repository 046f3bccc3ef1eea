//! Scan code set 1 decoding.
//!
//! [`ScancodeDecoder`] is a pure state machine: it owns the modifier state and
//! turns one scancode into at most one character. It does no I/O, so it can
//! be driven with synthetic byte sequences.

/// Escape key make code.
pub const SCANCODE_ESCAPE: u8 = 0x01;
/// Tab key make code.
pub const SCANCODE_TAB: u8 = 0x0F;
/// Enter key make code.
pub const SCANCODE_ENTER: u8 = 0x1C;
/// Left shift make code.
pub const SCANCODE_LEFT_SHIFT: u8 = 0x2A;
/// Right shift make code.
pub const SCANCODE_RIGHT_SHIFT: u8 = 0x36;
/// Caps lock make code.
pub const SCANCODE_CAPS_LOCK: u8 = 0x3A;

/// Bit set on every key release scancode.
pub const RELEASE_BIT: u8 = 0x80;

/// Sentinel posted to the mailbox when ESC is pressed.
pub const ESCAPE_SENTINEL: u8 = 0x1B;

/// Base character for each make code of a US keyboard. Zero means the key
/// produces no character.
#[rustfmt::skip]
pub static SCANCODE_TABLE: [u8; 128] = [
    0, 27, b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'-', b'=', 0x08, b'\t',
    b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i', b'o', b'p', b'[', b']', b'\n', 0, b'a', b's',
    b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';', b'\'', b'`', 0, b'\\', b'z', b'x', b'c', b'v',
    b'b', b'n', b'm', b',', b'.', b'/', 0, b'*', 0, b' ', 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, b'-', 0, 0, 0, b'+', 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Returns the character a US keyboard produces for `ch` with shift held.
///
/// Characters without a shifted form are returned unchanged.
pub const fn shifted_symbol(ch: u8) -> u8 {
    match ch {
        b'`' => b'~',
        b'1' => b'!',
        b'2' => b'@',
        b'3' => b'#',
        b'4' => b'$',
        b'5' => b'%',
        b'6' => b'^',
        b'7' => b'&',
        b'8' => b'*',
        b'9' => b'(',
        b'0' => b')',
        b'-' => b'_',
        b'=' => b'+',
        b'[' => b'{',
        b']' => b'}',
        b'\\' => b'|',
        b';' => b':',
        b'\'' => b'"',
        b',' => b'<',
        b'.' => b'>',
        b'/' => b'?',
        other => other,
    }
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub caps_lock: bool,
    pub shift: bool,
}

impl ModifierState {
    const CAPS_LOCK: u8 = 1 << 0;
    const SHIFT: u8 = 1 << 1;

    /// Packs the state into one byte.
    pub const fn bits(self) -> u8 {
        let caps_lock = if self.caps_lock { Self::CAPS_LOCK } else { 0 };
        let shift = if self.shift { Self::SHIFT } else { 0 };
        caps_lock | shift
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self {
            caps_lock: bits & Self::CAPS_LOCK != 0,
            shift: bits & Self::SHIFT != 0,
        }
    }
}

/// Result of decoding one scancode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// A character for the mailbox.
    Char(u8),
    /// ESC: request exit and post the sentinel.
    Escape,
    /// Nothing to deliver (modifier, release, or unmapped key).
    Ignored,
}

/// Scan code set 1 decoder with modifier tracking.
#[derive(Debug, Clone, Default)]
pub struct ScancodeDecoder {
    modifiers: ModifierState,
}

impl ScancodeDecoder {
    /// Creates a decoder with no modifiers active.
    pub const fn new() -> Self {
        Self {
            modifiers: ModifierState {
                caps_lock: false,
                shift: false,
            },
        }
    }

    /// Creates a decoder with the given modifiers.
    pub const fn with_modifiers(modifiers: ModifierState) -> Self {
        Self { modifiers }
    }

    /// Current modifier state.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// Decodes one scancode, updating modifiers.
    pub fn decode(&mut self, scancode: u8) -> KeyAction {
        if scancode == SCANCODE_ESCAPE {
            return KeyAction::Escape;
        }
        if scancode & RELEASE_BIT != 0 {
            self.release(scancode & !RELEASE_BIT);
            return KeyAction::Ignored;
        }
        match scancode {
            SCANCODE_CAPS_LOCK => {
                self.modifiers.caps_lock = !self.modifiers.caps_lock;
                KeyAction::Ignored
            }
            SCANCODE_ENTER => KeyAction::Char(b'\n'),
            SCANCODE_TAB => KeyAction::Char(b'\t'),
            SCANCODE_LEFT_SHIFT | SCANCODE_RIGHT_SHIFT => {
                self.modifiers.shift = true;
                KeyAction::Ignored
            }
            code => match self.translate(code) {
                0 => KeyAction::Ignored,
                ch => KeyAction::Char(ch),
            },
        }
    }

    /// Applies only the modifier effect of `scancode`.
    ///
    /// Used for the trailing bytes of a drained batch, which never produce a
    /// character.
    pub fn track_modifiers(&mut self, scancode: u8) {
        if scancode & RELEASE_BIT != 0 {
            self.release(scancode & !RELEASE_BIT);
            return;
        }
        match scancode {
            SCANCODE_CAPS_LOCK => self.modifiers.caps_lock = !self.modifiers.caps_lock,
            SCANCODE_LEFT_SHIFT | SCANCODE_RIGHT_SHIFT => self.modifiers.shift = true,
            _ => {}
        }
    }

    fn release(&mut self, make_code: u8) {
        if matches!(make_code, SCANCODE_LEFT_SHIFT | SCANCODE_RIGHT_SHIFT) {
            self.modifiers.shift = false;
        }
    }

    /// Applies the modifier rules to the table entry for `code`.
    fn translate(&self, code: u8) -> u8 {
        let base = SCANCODE_TABLE[usize::from(code & !RELEASE_BIT)];
        if base == 0 {
            return 0;
        }
        let ModifierState { caps_lock, shift } = self.modifiers;
        match (caps_lock, shift) {
            // Caps and shift cancel out for letters; symbols still shift.
            (true, true) => shifted_symbol(base),
            (true, false) => base.to_ascii_uppercase(),
            (false, true) if base.is_ascii_alphabetic() => base.to_ascii_uppercase(),
            (false, true) => shifted_symbol(base),
            (false, false) => base,
        }
    }
}
