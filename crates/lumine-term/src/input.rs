// SPDX-License-Identifier: MIT
//
// Keyboard input decoding.
//
// Raw stdin bytes become key and paste events. Recognized forms:
//
// - printable ASCII and multi-byte UTF-8
// - C0 control bytes as Ctrl+letter (plus Enter, Tab, Backspace)
// - ESC-prefixed keys as Alt+key
// - CSI and SS3 sequences for arrows, Home/End, editing keys, F1–F12,
//   including the xterm `;mod` modifier parameter
// - bracketed paste, delivered as one `Paste` event
//
// A sequence may be split across reads, so undecoded bytes are kept until
// the next `feed`. A lone ESC is ambiguous until more input arrives or the
// event loop gives up waiting and calls `flush`.

use bitflags::bitflags;

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Text between bracketed-paste delimiters.
    Paste(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    #[must_use]
    pub const fn alt(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::ALT)
    }

    /// True for `Ctrl+ch` with no other modifier.
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers == Modifiers::CTRL && self.code == KeyCode::Char(ch)
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// xterm modifier bits (the CSI parameter is `1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

const PASTE_OPEN: &[u8] = b"\x1b[200~";
const PASTE_CLOSE: &[u8] = b"\x1b[201~";

/// Outcome of decoding at the front of the pending bytes.
enum Step {
    /// An event and how many bytes it used.
    Emit(Event, usize),
    /// Bytes to discard.
    Skip(usize),
    /// Need more bytes before anything can be decided.
    Wait,
}

/// Incremental byte-to-event decoder.
#[derive(Debug, Default)]
pub struct Decoder {
    pending: Vec<u8>,
    in_paste: bool,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and decode as many events as possible.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        self.pending.extend_from_slice(bytes);
        let mut events = Vec::new();
        let mut at = 0;

        while at < self.pending.len() {
            let rest = &self.pending[at..];

            if self.in_paste {
                let Some(end) = find(rest, PASTE_CLOSE) else {
                    break;
                };
                events.push(Event::Paste(
                    String::from_utf8_lossy(&rest[..end]).into_owned(),
                ));
                at += end + PASTE_CLOSE.len();
                self.in_paste = false;
                continue;
            }

            if rest.starts_with(PASTE_OPEN) {
                self.in_paste = true;
                at += PASTE_OPEN.len();
                continue;
            }
            if rest.len() < PASTE_OPEN.len() && rest.len() > 2 && PASTE_OPEN.starts_with(rest) {
                break;
            }

            match decode(rest) {
                Step::Emit(event, used) => {
                    events.push(event);
                    at += used;
                }
                Step::Skip(n) => at += n,
                Step::Wait => break,
            }
        }

        self.pending.drain(..at);
        events
    }

    /// Whether undecoded bytes are waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() && !self.in_paste
    }

    /// Give up waiting: a held ESC becomes the Escape key and any other
    /// leftover ASCII becomes plain keys.
    pub fn flush(&mut self) -> Vec<Event> {
        if self.in_paste {
            return Vec::new();
        }
        let events = self
            .pending
            .iter()
            .filter_map(|&b| match b {
                0x1b => Some(KeyEvent::plain(KeyCode::Escape)),
                0x20..=0x7e => Some(KeyEvent::plain(KeyCode::Char(b as char))),
                _ => None,
            })
            .map(Event::Key)
            .collect();
        self.pending.clear();
        events
    }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

fn decode(buf: &[u8]) -> Step {
    match buf[0] {
        0x1b => decode_escape(buf),
        b'\r' | b'\n' => Step::Emit(key(KeyCode::Enter, Modifiers::empty()), 1),
        b'\t' => Step::Emit(key(KeyCode::Tab, Modifiers::empty()), 1),
        0x08 | 0x7f => Step::Emit(key(KeyCode::Backspace, Modifiers::empty()), 1),
        0x00 => Step::Emit(key(KeyCode::Char(' '), Modifiers::CTRL), 1),
        b @ 0x01..=0x1a => Step::Emit(key(KeyCode::Char((b - 1 + b'a') as char), Modifiers::CTRL), 1),
        0x1c..=0x1f => Step::Skip(1),
        b @ 0x20..=0x7e => Step::Emit(key(KeyCode::Char(b as char), Modifiers::empty()), 1),
        _ => decode_utf8(buf),
    }
}

fn decode_escape(buf: &[u8]) -> Step {
    let Some(&next) = buf.get(1) else {
        return Step::Wait;
    };
    match next {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        0x1b => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
        _ => match decode(&buf[1..]) {
            Step::Emit(Event::Key(k), used) => Step::Emit(
                key(k.code, k.modifiers | Modifiers::ALT),
                used + 1,
            ),
            Step::Wait => Step::Wait,
            _ => Step::Emit(key(KeyCode::Escape, Modifiers::empty()), 1),
        },
    }
}

fn decode_csi(buf: &[u8]) -> Step {
    // Parameter and intermediate bytes, then one final byte in 0x40..=0x7e.
    let mut end = 2;
    loop {
        match buf.get(end) {
            None => return Step::Wait,
            Some(0x40..=0x7e) => break,
            Some(0x20..=0x3f) => end += 1,
            Some(_) => return Step::Skip(end),
        }
    }
    let used = end + 1;
    let params: Vec<u16> = buf[2..end]
        .split(|&b| b == b';')
        .map(parse_number)
        .collect();
    let mods = params.get(1).copied().map_or(Modifiers::empty(), modifiers_from_param);

    let code = match buf[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'Z' => return Step::Emit(key(KeyCode::Tab, Modifiers::SHIFT), used),
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            11 => KeyCode::F(1),
            12 => KeyCode::F(2),
            13 => KeyCode::F(3),
            14 => KeyCode::F(4),
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Step::Skip(used),
        },
        _ => return Step::Skip(used),
    };
    Step::Emit(key(code, mods), used)
}

fn decode_ss3(buf: &[u8]) -> Step {
    let Some(&b) = buf.get(2) else {
        return Step::Wait;
    };
    let code = match b {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Step::Skip(3),
    };
    Step::Emit(key(code, Modifiers::empty()), 3)
}

fn decode_utf8(buf: &[u8]) -> Step {
    let len = match buf[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Step::Skip(1),
    };
    if buf.len() < len {
        return Step::Wait;
    }
    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Step::Emit(key(KeyCode::Char(ch), Modifiers::empty()), len),
        None => Step::Skip(1),
    }
}

fn parse_number(digits: &[u8]) -> u16 {
    digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u16, |n, b| n.saturating_mul(10).saturating_add(u16::from(b - b'0')))
}

#[allow(clippy::cast_possible_truncation)]
fn modifiers_from_param(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
