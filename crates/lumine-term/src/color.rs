// SPDX-License-Identifier: MIT
//
// Terminal colors.
//
// A cell carries a resolved color: truecolor RGB, an index into the 256-color
// palette, or the terminal's own default. Themes are authored as hex strings
// (`#1E1E1E`, `#FFF`), so the parser lives here next to the type it produces.

use std::fmt;

/// A color as stored in a [`Cell`](crate::cell::Cell).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
    /// Index into the xterm 256-color palette.
    Ansi256(u8),
    /// Whatever the terminal uses when no color is set.
    #[default]
    Default,
}

impl CellColor {
    pub const WHITE: Self = Self::Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::Rgb(0x00, 0x00, 0x00);
    /// X11 `lightgray`.
    pub const LIGHT_GRAY: Self = Self::Rgb(0xD3, 0xD3, 0xD3);

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional).
    ///
    /// ```
    /// use lumine_term::color::CellColor;
    ///
    /// assert_eq!(CellColor::from_hex("#264f78"), Some(CellColor::Rgb(0x26, 0x4f, 0x78)));
    /// assert_eq!(CellColor::from_hex("fff"), Some(CellColor::WHITE));
    /// assert_eq!(CellColor::from_hex("#12345"), None);
    /// ```
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s).as_bytes();
        match digits.len() {
            6 => Some(Self::Rgb(
                hex_pair(digits[0], digits[1])?,
                hex_pair(digits[2], digits[3])?,
                hex_pair(digits[4], digits[5])?,
            )),
            3 => Some(Self::Rgb(
                hex_pair(digits[0], digits[0])?,
                hex_pair(digits[1], digits[1])?,
                hex_pair(digits[2], digits[2])?,
            )),
            _ => None,
        }
    }

    /// Like [`from_hex`](Self::from_hex) for compile-time palette tables.
    /// Malformed input falls back to [`CellColor::Default`].
    #[must_use]
    pub const fn hex(s: &str) -> Self {
        let b = s.as_bytes();
        let start = if !b.is_empty() && b[0] == b'#' { 1 } else { 0 };
        if b.len() - start != 6 {
            return Self::Default;
        }
        match (
            hex_pair(b[start], b[start + 1]),
            hex_pair(b[start + 2], b[start + 3]),
            hex_pair(b[start + 4], b[start + 5]),
        ) {
            (Some(r), Some(g), Some(b)) => Self::Rgb(r, g, b),
            _ => Self::Default,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(i) => write!(f, "ansi({i})"),
            Self::Default => f.write_str("default"),
        }
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

const fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    match (hex_digit(hi), hex_digit(lo)) {
        (Some(h), Some(l)) => Some(h * 16 + l),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
