// SPDX-License-Identifier: MIT
//
// ANSI escape sequences.
//
// Stateless writers for every control sequence the editor sends. Deciding
// when to send them belongs to the renderer and the terminal guard.
// Coordinates are 0-based here and converted to the 1-based form on output.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// CUP: move the cursor to column `x`, row `y`.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// DECSCUSR cursor styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    SteadyBlock,
    SteadyUnderline,
    SteadyBar,
}

pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyUnderline => 4,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

/// OSC 12: set the cursor color. Terminals without support ignore it.
pub fn set_cursor_color(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Rgb(r, g, b) => write!(w, "\x1b]12;#{r:02x}{g:02x}{b:02x}\x07"),
        _ => reset_cursor_color(w),
    }
}

/// OSC 112: restore the terminal's own cursor color.
#[inline]
pub fn reset_cursor_color(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b]112\x07")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// DEC 2026: hold output until [`end_sync`] so frames never tear.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

/// DEC 2004: pasted text arrives wrapped in `ESC[200~ … ESC[201~`.
#[inline]
pub fn enable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004h")
}

#[inline]
pub fn disable_bracketed_paste(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2004l")
}

/// OSC 2: set the window title. Control characters are dropped.
pub fn set_title(w: &mut impl Write, title: &str) -> io::Result<()> {
    w.write_all(b"\x1b]2;")?;
    for ch in title.chars().filter(|c| !c.is_control()) {
        write!(w, "{ch}")?;
    }
    w.write_all(b"\x07")
}

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// SGR 0.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[38;2;{r};{g};{b}m"),
        CellColor::Ansi256(i) => write!(w, "\x1b[38;5;{i}m"),
        CellColor::Default => w.write_all(b"\x1b[39m"),
    }
}

pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Rgb(r, g, b) => write!(w, "\x1b[48;2;{r};{g};{b}m"),
        CellColor::Ansi256(i) => write!(w, "\x1b[48;5;{i}m"),
        CellColor::Default => w.write_all(b"\x1b[49m"),
    }
}

/// All set attributes in one sequence, e.g. `ESC[1;4m`. Empty writes nothing.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    const CODES: [(Attr, &str); 5] = [
        (Attr::BOLD, "1"),
        (Attr::DIM, "2"),
        (Attr::ITALIC, "3"),
        (Attr::UNDERLINE, "4"),
        (Attr::INVERSE, "7"),
    ];
    if attr.is_empty() {
        return Ok(());
    }
    let codes: Vec<&str> = CODES
        .iter()
        .filter(|(flag, _)| attr.contains(*flag))
        .map(|(_, code)| *code)
        .collect();
    write!(w, "\x1b[{}m", codes.join(";"))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn colors() {
        assert_eq!(emit(|w| fg(w, CellColor::Rgb(1, 2, 3))), "\x1b[38;2;1;2;3m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(200))), "\x1b[48;5;200m");
        assert_eq!(emit(|w| fg(w, CellColor::Default)), "\x1b[39m");
        assert_eq!(emit(|w| bg(w, CellColor::Default)), "\x1b[49m");
    }

    #[test]
    fn attrs_combined() {
        assert_eq!(emit(|w| attrs(w, Attr::BOLD | Attr::INVERSE)), "\x1b[1;7m");
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn cursor_color_osc() {
        assert_eq!(
            emit(|w| set_cursor_color(w, CellColor::Rgb(0xff, 0xff, 0xff))),
            "\x1b]12;#ffffff\x07"
        );
        assert_eq!(
            emit(|w| set_cursor_color(w, CellColor::Default)),
            "\x1b]112\x07"
        );
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::SteadyBar)), "\x1b[6 q");
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::Default)), "\x1b[0 q");
    }

    #[test]
    fn title_strips_control_chars() {
        assert_eq!(
            emit(|w| set_title(w, "Lumine IDE - a\x07b.py")),
            "\x1b]2;Lumine IDE - ab.py\x07"
        );
    }
}
