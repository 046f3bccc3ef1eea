//! Minimal `printf`-style formatting.
//!
//! Directives are `%[0][width]conv` where `width` is a single digit:
//!
//! | conv | argument |
//! |---|---|
//! | `d` | signed decimal |
//! | `u` | unsigned decimal |
//! | `x` | lowercase hexadecimal |
//! | `s` | string, `(null)` when absent |
//! | other | next argument printed as one raw character |
//!
//! Padding is emitted before the converted text, sign included. There is no
//! escape for a literal `%`: `%%` consumes an argument like any other unknown
//! conversion.

/// One formatting argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    Int(i32),
    Uint(u32),
    Str(Option<&'a str>),
    Char(u8),
}

impl Arg<'_> {
    fn bits(self) -> i32 {
        match self {
            Arg::Int(v) => v,
            Arg::Uint(v) => v as i32,
            Arg::Char(c) => i32::from(c),
            Arg::Str(_) => 0,
        }
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::Int(value)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::Uint(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(Some(value))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(value: Option<&'a str>) -> Self {
        Arg::Str(value)
    }
}

const NULL_TEXT: &[u8] = b"(null)";

/// Longest integer rendering: `-2147483648`.
pub const INT_BUF: usize = 11;

/// Renders `value` in base 10 (signed for `d`, unsigned for `u`) or base 16
/// (`x`) into the tail of `buf`, returning the written slice.
pub fn format_integer(buf: &mut [u8; INT_BUF], conv: u8, value: i32) -> &[u8] {
    let negative = conv == b'd' && value < 0;
    let (mut magnitude, base) = match conv {
        b'd' => (value.unsigned_abs(), 10),
        b'x' => (value as u32, 16),
        _ => (value as u32, 10),
    };

    let mut start = buf.len();
    loop {
        let digit = (magnitude % base) as u8;
        start -= 1;
        buf[start] = if digit < 10 {
            b'0' + digit
        } else {
            b'a' + digit - 10
        };
        magnitude /= base;
        if magnitude == 0 {
            break;
        }
    }
    if negative {
        start -= 1;
        buf[start] = b'-';
    }
    &buf[start..]
}

/// Expands `fmt` against `args`, passing every output byte to `emit`.
///
/// Missing arguments read as zero, or as an absent string for `%s`.
pub fn render(fmt: &str, args: &[Arg<'_>], mut emit: impl FnMut(u8)) {
    let mut args = args.iter().copied();
    let mut bytes = fmt.bytes();

    while let Some(byte) = bytes.next() {
        if byte != b'%' {
            emit(byte);
            continue;
        }

        let Some(mut conv) = bytes.next() else {
            return;
        };
        let mut zero_pad = false;
        let mut width = 0;
        if conv == b'0' {
            zero_pad = true;
            match bytes.next() {
                Some(next) => conv = next,
                None => return,
            }
        }
        if conv.is_ascii_digit() {
            width = usize::from(conv - b'0');
            match bytes.next() {
                Some(next) => conv = next,
                None => return,
            }
        }

        let mut digits = [0u8; INT_BUF];
        let text: &[u8] = match conv {
            b'd' | b'u' | b'x' => {
                let value = args.next().map_or(0, Arg::bits);
                format_integer(&mut digits, conv, value)
            }
            b's' => match args.next() {
                Some(Arg::Str(Some(s))) => s.as_bytes(),
                _ => NULL_TEXT,
            },
            _ => {
                if let Some(arg) = args.next() {
                    emit(arg.bits() as u8);
                }
                continue;
            }
        };

        let fill = if zero_pad { b'0' } else { b' ' };
        for _ in text.len()..width {
            emit(fill);
        }
        text.iter().copied().for_each(&mut emit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;

    fn format(fmt: &str, args: &[Arg<'_>]) -> String {
        let mut out = String::new();
        render(fmt, args, |b| out.push(b as char));
        out
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(format("%d", &[Arg::Int(-42)]), "-42");
        assert_eq!(format("%u", &[Arg::Uint(3_000_000_000)]), "3000000000");
        assert_eq!(format("%x", &[Arg::Uint(0xBEEF)]), "beef");
        assert_eq!(format("%d", &[Arg::Int(i32::MIN)]), "-2147483648");
        assert_eq!(format("%u", &[Arg::Int(-1)]), "4294967295");
        assert_eq!(format("%d", &[Arg::Int(0)]), "0");
    }

    #[test]
    fn test_padding_precedes_text() {
        assert_eq!(format("[%5d]", &[Arg::Int(42)]), "[   42]");
        assert_eq!(format("[%05d]", &[Arg::Int(42)]), "[00042]");
        assert_eq!(format("[%04d]", &[Arg::Int(-7)]), "[00-7]");
        assert_eq!(format("[%2d]", &[Arg::Int(12345)]), "[12345]");
        assert_eq!(format("[%6s]", &[Arg::from("ab")]), "[    ab]");
    }

    #[test]
    fn test_absent_string() {
        assert_eq!(format("%s", &[Arg::Str(None)]), "(null)");
        assert_eq!(format("%s", &[]), "(null)");
    }

    #[test]
    fn test_unknown_directive_prints_raw_character() {
        assert_eq!(format("%c!", &[Arg::Char(b'z')]), "z!");
        assert_eq!(format("100%%", &[Arg::Char(b'#')]), "100#");
    }

    #[test]
    fn test_arguments_consumed_in_order() {
        assert_eq!(
            format("x=%d y=%d %s", &[Arg::Int(3), Arg::Int(4), Arg::from("ok")]),
            "x=3 y=4 ok"
        );
    }

    #[test]
    fn test_trailing_percent_is_dropped() {
        assert_eq!(format("abc%", &[]), "abc");
    }
}
