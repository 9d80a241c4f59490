//! View: painting the editor into a lumine-term [`FrameBuffer`].
//!
//! The screen is split into four bands:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ File  Edit  Settings  Help   Lumine IDE - x  │  menu bar
//! │ [ New ] [ Open ] [ Save ]                    │  toolbar
//! │   1 def f(x):                                │
//! │   2     return x  # identity                 │  gutter + text
//! │   3                                          │
//! │ Line: 2, Column: 4 | Total Lines: 3          │  status line
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Drop-down menus, the path prompt and message boxes are painted on top
//! afterwards by their own functions.
//!
//! [`View`] only holds scroll state. Buffer, cursor, spans and theme are
//! borrowed for each paint through [`Document`], so nothing here can get
//! out of step with the shell's state.

use std::ops::Range as StdRange;

use lumine_term::cell::Attr;
use lumine_term::frame::{FrameBuffer, Style, char_width, string_width};
use lumine_theme::{Tag, Theme, ThemeName};

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::highlight::{Span, overlay};
use crate::locale::{Language, LocaleKey, LocaleMap};
use crate::menu::{Menu, MenuCommand, MenuEntry, MenuState, TOOLBAR};
use crate::prompt::PathPrompt;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Where each band sits for a given screen size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub menu_y: u16,
    pub toolbar_y: u16,
    pub text_y: u16,
    pub text_height: u16,
    pub status_y: u16,
}

impl Layout {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            menu_y: 0,
            toolbar_y: 1,
            text_y: 2,
            text_height: height.saturating_sub(3),
            status_y: height.saturating_sub(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gutter columns for `line_count` lines: a leading space, at least three
/// digit columns, and a trailing space.
#[must_use]
pub fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).ilog10() + 1;
    #[allow(clippy::cast_possible_truncation)]
    let digits = digits.max(3) as u16;
    digits + 2
}

/// Display column of char `char_col` in `chars`, expanding tabs and
/// counting wide chars as two.
#[must_use]
pub fn char_col_to_display_col<I: Iterator<Item = char>>(
    chars: I,
    char_col: usize,
    tab_width: u8,
) -> usize {
    let tab_w = usize::from(tab_width.max(1));
    let mut col = 0;
    for ch in chars.take(char_col) {
        match ch {
            '\n' | '\r' => break,
            '\t' => col = (col / tab_w + 1) * tab_w,
            _ => col += char_width(ch),
        }
    }
    col
}

/// `"Line: 3, Column: 0 | Total Lines: 10"` in the UI language.
///
/// Line is 1-based, column 0-based, and the total is the number of line
/// breaks plus one.
#[must_use]
pub fn status_text(cursor: &Cursor, buf: &Buffer, strings: &LocaleMap) -> String {
    format!(
        "{}: {}, {}: {} | {}: {}",
        strings.get(LocaleKey::Line),
        cursor.line() + 1,
        strings.get(LocaleKey::Column),
        cursor.col(),
        strings.get(LocaleKey::TotalLines),
        buf.line_count(),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn width_u16(s: &str) -> u16 {
    string_width(s).min(usize::from(u16::MAX)) as u16
}

// ---------------------------------------------------------------------------
// Document view
// ---------------------------------------------------------------------------

/// Everything the text area needs for one paint.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub buf: &'a Buffer,
    pub cursor: &'a Cursor,
    pub spans: &'a [Span],
    pub theme: &'a Theme,
}

/// Scroll state of the text area.
#[derive(Debug, Clone)]
pub struct View {
    top_line: usize,
    left_col: usize,
    tab_width: u8,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            top_line: 0,
            left_col: 0,
            tab_width: 4,
        }
    }

    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    #[inline]
    #[must_use]
    pub const fn left_col(&self) -> usize {
        self.left_col
    }

    /// Back to the top-left corner, for a freshly loaded document.
    pub const fn reset(&mut self) {
        self.top_line = 0;
        self.left_col = 0;
    }

    /// Scroll just enough for the cursor to be on screen.
    pub fn ensure_cursor_visible(&mut self, cursor: &Cursor, buf: &Buffer, text_width: u16, text_height: u16) {
        let height = usize::from(text_height);
        let width = usize::from(text_width);
        if height == 0 || width == 0 {
            return;
        }

        let line = cursor.line();
        if line < self.top_line {
            self.top_line = line;
        }
        if line >= self.top_line + height {
            self.top_line = line + 1 - height;
        }

        let col = buf.line(line).map_or(0, |l| {
            char_col_to_display_col(l.chars(), cursor.col(), self.tab_width)
        });
        if col < self.left_col {
            self.left_col = col;
        }
        if col >= self.left_col + width {
            self.left_col = col + 1 - width;
        }
    }

    /// Paint gutter and text into `(x, y, width, height)`. Returns the
    /// cursor's screen cell when it is inside the area.
    pub fn render(
        &mut self,
        frame: &mut FrameBuffer,
        doc: &Document<'_>,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Option<(u16, u16)> {
        if width == 0 || height == 0 {
            return None;
        }
        let buf = doc.buf;
        let line_count = buf.line_count();
        let gw = gutter_width(line_count).min(width);
        let text_x = x + gw;
        let text_width = width - gw;

        self.ensure_cursor_visible(doc.cursor, buf, text_width, height);

        // Resolve tags once for every visible char.
        let bottom = (self.top_line + usize::from(height)).min(line_count);
        let win_start = buf.line_start(self.top_line).unwrap_or(0);
        let win_end = buf.line_start(bottom).unwrap_or_else(|| buf.len_chars());
        let tags = overlay(doc.spans, win_start, win_end);
        let selection = doc.cursor.selection().and_then(|r| {
            Some(buf.pos_to_char_idx(r.start)?..buf.pos_to_char_idx(r.end)?)
        });
        let painter = LinePainter {
            theme: doc.theme,
            tags: &tags,
            win_start,
            selection,
            tab_width: self.tab_width,
            left_col: self.left_col,
        };

        frame.fill_rect(x, y, gw, height, doc.theme.gutter.style());
        frame.fill_rect(text_x, y, text_width, height, doc.theme.text().style());

        for row in 0..height {
            let line = self.top_line + usize::from(row);
            if line >= line_count {
                break;
            }
            paint_line_number(frame, x, y + row, gw, line + 1, doc.theme.gutter.style());
            painter.paint(frame, buf, line, text_x, y + row, text_width);
        }

        let row = doc.cursor.line().checked_sub(self.top_line)?;
        let col = buf.line(doc.cursor.line()).map_or(0, |l| {
            char_col_to_display_col(l.chars(), doc.cursor.col(), self.tab_width)
        });
        let col = col.checked_sub(self.left_col)?;
        if row >= usize::from(height) || col >= usize::from(text_width) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let (col, row) = (col as u16, row as u16);
        Some((text_x + col, y + row))
    }
}

/// Per-paint state shared by every text row.
struct LinePainter<'a> {
    theme: &'a Theme,
    tags: &'a [Option<Tag>],
    win_start: usize,
    selection: Option<StdRange<usize>>,
    tab_width: u8,
    left_col: usize,
}

impl LinePainter<'_> {
    fn style_at(&self, idx: usize) -> Style {
        let tag = idx
            .checked_sub(self.win_start)
            .and_then(|i| self.tags.get(i).copied().flatten());
        let selected = self.selection.as_ref().is_some_and(|s| s.contains(&idx));
        match (tag, selected) {
            (Some(tag), true) => Style::new(self.theme.syntax.color(tag), self.theme.selection.bg),
            (None, true) => self.theme.selection.style(),
            (Some(tag), false) => self.theme.tag(tag).style(),
            (None, false) => self.theme.text().style(),
        }
    }

    fn paint(&self, frame: &mut FrameBuffer, buf: &Buffer, line: usize, x: u16, y: u16, width: u16) {
        let (Some(slice), Some(start)) = (buf.line(line), buf.line_start(line)) else {
            return;
        };
        let tab_w = usize::from(self.tab_width.max(1));
        let limit = x + width;
        let mut display = 0usize;
        let mut utf8 = [0u8; 4];

        for (i, ch) in slice.chars().enumerate() {
            let idx = start + i;
            let style = self.style_at(idx);
            if ch == '\n' || ch == '\r' {
                // A selected line break shows as one highlighted cell.
                if self.selection.as_ref().is_some_and(|s| s.contains(&idx)) {
                    if let Some(sx) = self.screen_x(x, display, limit) {
                        frame.paint_text(sx, y, " ", style, limit);
                    }
                }
                break;
            }
            let (glyph, w): (&str, usize) = if ch == '\t' {
                (" ", (display / tab_w + 1) * tab_w - display)
            } else {
                (&*ch.encode_utf8(&mut utf8), char_width(ch))
            };
            if w == 0 {
                continue;
            }
            if ch == '\t' {
                for k in 0..w {
                    if let Some(sx) = self.screen_x(x, display + k, limit) {
                        frame.paint_text(sx, y, " ", style, limit);
                    }
                }
            } else if let Some(sx) = self.screen_x(x, display, limit) {
                frame.paint_text(sx, y, glyph, style, limit);
            } else if display < self.left_col && display + w > self.left_col {
                // Wide char cut by the left edge.
                frame.paint_text(x, y, " ", style, limit);
            }
            display += w;
            if display >= self.left_col + usize::from(width) {
                break;
            }
        }
    }

    /// Screen column for display column `col`, if it is right of the scroll
    /// offset and before `limit`.
    fn screen_x(&self, x: u16, col: usize, limit: u16) -> Option<u16> {
        let offset = u16::try_from(col.checked_sub(self.left_col)?).ok()?;
        let sx = x.checked_add(offset)?;
        (sx < limit).then_some(sx)
    }
}

fn paint_line_number(frame: &mut FrameBuffer, x: u16, y: u16, gutter_w: u16, number: usize, style: Style) {
    let text = format!("{number:>width$} ", width = usize::from(gutter_w.saturating_sub(1)));
    frame.paint_text(x, y, &text, style, x + gutter_w);
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

pub fn render_status_line(frame: &mut FrameBuffer, y: u16, text: &str, theme: &Theme) {
    let style = theme.status_line.style();
    let width = frame.width();
    frame.fill_rect(0, y, width, 1, style);
    frame.paint_text(1, y, text, style, width);
}

// ---------------------------------------------------------------------------
// Menu bar and toolbar
// ---------------------------------------------------------------------------

/// Left edge of each menu title on the bar.
#[must_use]
pub fn menu_title_xs(menus: &[Menu], strings: &LocaleMap) -> Vec<u16> {
    let mut x = 1u16;
    menus
        .iter()
        .map(|m| {
            let at = x;
            x = x.saturating_add(width_u16(strings.get(m.title)) + 2);
            at
        })
        .collect()
}

/// Menu titles on the left, the window title on the right.
pub fn render_menu_bar(
    frame: &mut FrameBuffer,
    y: u16,
    menus: &[Menu],
    open: Option<MenuState>,
    strings: &LocaleMap,
    theme: &Theme,
    title: &str,
) {
    let width = frame.width();
    let bar = theme.menu_bar.style();
    frame.fill_rect(0, y, width, 1, bar);

    let xs = menu_title_xs(menus, strings);
    let mut end = 0;
    for (i, (menu, &x)) in menus.iter().zip(&xs).enumerate() {
        let style = if open.is_some_and(|s| s.menu == i) {
            theme.menu_selected.style()
        } else {
            bar
        };
        let label = format!(" {} ", strings.get(menu.title));
        end = x + frame.paint_text(x, y, &label, style, width);
    }

    let tw = width_u16(title);
    if end + tw + 2 <= width {
        frame.paint_text(width - tw - 1, y, title, bar, width);
    }
}

pub fn render_toolbar(frame: &mut FrameBuffer, y: u16, strings: &LocaleMap, theme: &Theme) {
    let width = frame.width();
    frame.fill_rect(0, y, width, 1, theme.toolbar.style());
    let button = theme.menu_bar.style();
    let mut x = 1u16;
    for item in &TOOLBAR {
        let label = format!("[ {} ]", strings.get(item.label));
        x += frame.paint_text(x, y, &label, button, width) + 1;
    }
}

/// The open drop-down under its title. `checked` marks the active theme
/// and language.
#[allow(clippy::too_many_arguments)]
pub fn render_drop_down(
    frame: &mut FrameBuffer,
    y: u16,
    menus: &[Menu],
    state: MenuState,
    strings: &LocaleMap,
    theme: &Theme,
    current: (ThemeName, Language),
) {
    let Some(menu) = menus.get(state.menu) else {
        return;
    };
    let is_checked = |cmd: MenuCommand| match cmd {
        MenuCommand::SetTheme(t) => t == current.0,
        MenuCommand::SetLanguage(l) => l == current.1,
        _ => false,
    };

    let rows: Vec<(String, Option<&str>)> = menu
        .entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Item(item) => {
                let mark = if is_checked(item.command) { '●' } else { ' ' };
                (format!(" {mark} {}", strings.get(item.label)), item.command.shortcut())
            }
            MenuEntry::Heading(key) => (format!(" {}", strings.get(*key)), None),
            MenuEntry::Separator => (String::new(), None),
        })
        .collect();

    let inner = rows
        .iter()
        .map(|(label, hint)| width_u16(label) + hint.map_or(0, |h| width_u16(h) + 3))
        .max()
        .unwrap_or(0)
        + 2;
    let width = inner.min(frame.width());
    let xs = menu_title_xs(menus, strings);
    let x = xs
        .get(state.menu)
        .copied()
        .unwrap_or(0)
        .min(frame.width().saturating_sub(width));

    let body = theme.menu.style();
    for (i, (entry, (label, hint))) in menu.entries.iter().zip(&rows).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let row = y + i as u16;
        let style = match entry {
            _ if i == state.entry => theme.menu_selected.style(),
            MenuEntry::Heading(_) => body.with_attrs(Attr::BOLD),
            _ => body,
        };
        frame.fill_rect(x, row, width, 1, style);
        if matches!(entry, MenuEntry::Separator) {
            let line = "─".repeat(usize::from(width));
            frame.paint_text(x, row, &line, body.with_attrs(Attr::DIM), x + width);
            continue;
        }
        frame.paint_text(x, row, label, style, x + width);
        if let Some(hint) = hint {
            let hx = (x + width).saturating_sub(width_u16(hint) + 1);
            frame.paint_text(hx, row, hint, style.with_attrs(style.attrs | Attr::DIM), x + width);
        }
    }
}

// ---------------------------------------------------------------------------
// Path prompt
// ---------------------------------------------------------------------------

/// Paint the prompt over the status row. Returns the caret cell.
pub fn render_prompt(frame: &mut FrameBuffer, y: u16, prompt: &PathPrompt, strings: &LocaleMap, theme: &Theme) -> (u16, u16) {
    let width = frame.width();
    let style = theme.status_line.style();
    frame.fill_rect(0, y, width, 1, style);

    let label = strings.get(prompt.purpose().label());
    let input_x = 1 + frame.paint_text(1, y, label, style.with_attrs(Attr::BOLD), width) + 1;
    let avail = usize::from(width.saturating_sub(input_x + 1));

    // Drop leading chars until the caret fits.
    let chars: Vec<char> = prompt.input().chars().collect();
    let caret = prompt.cursor().min(chars.len());
    let mut skip = 0;
    while skip < caret && chars[skip..caret].iter().map(|&c| char_width(c)).sum::<usize>() >= avail {
        skip += 1;
    }
    let shown: String = chars[skip..].iter().collect();
    frame.paint_text(input_x, y, &shown, theme.text().style(), width);

    let before: usize = chars[skip..caret].iter().map(|&c| char_width(c)).sum();
    #[allow(clippy::cast_possible_truncation)]
    let cx = (usize::from(input_x) + before).min(usize::from(width.saturating_sub(1))) as u16;
    (cx, y)
}

// ---------------------------------------------------------------------------
// Message box
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A modal notice dismissed with Enter or Escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

impl MessageBox {
    #[must_use]
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Greedy word wrap at `width` display columns. Explicit newlines are kept;
/// a word longer than `width` is split.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0;
        for word in para.split(' ') {
            let word_w = string_width(word);
            let sep = usize::from(!line.is_empty());
            if line_w + sep + word_w <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_w += sep + word_w;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line_w = 0;
            for ch in word.chars() {
                let w = char_width(ch);
                if line_w + w > width {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(ch);
                line_w += w;
            }
        }
        lines.push(line);
    }
    lines
}

/// Centered box: title bar, wrapped body, and an OK button.
pub fn render_message_box(frame: &mut FrameBuffer, msg: &MessageBox, strings: &LocaleMap, theme: &Theme) {
    let (fw, fh) = (frame.width(), frame.height());
    if fw < 8 || fh < 5 {
        return;
    }
    let max_inner = usize::from(fw - 6).min(60);
    let lines = wrap(&msg.body, max_inner);
    let button = format!("[ {} ]", strings.get(LocaleKey::Ok));
    let inner = lines
        .iter()
        .map(|l| string_width(l))
        .chain([string_width(&msg.title), string_width(&button)])
        .max()
        .unwrap_or(0)
        .min(max_inner);

    #[allow(clippy::cast_possible_truncation)]
    let w = (inner + 4) as u16;
    let body_rows = lines.len().min(usize::from(fh.saturating_sub(5)));
    #[allow(clippy::cast_possible_truncation)]
    let h = (body_rows + 4) as u16;
    let x = (fw - w) / 2;
    let y = fh.saturating_sub(h) / 2;

    let title_style = match msg.kind {
        MessageKind::Info => theme.dialog_title.style(),
        MessageKind::Error => theme.error_title.style(),
    };
    let body = theme.dialog.style();

    frame.fill_rect(x, y, w, 1, title_style);
    frame.paint_text(x + 2, y, &msg.title, title_style, x + w);
    frame.fill_rect(x, y + 1, w, h - 1, body);
    for (i, line) in lines.iter().take(body_rows).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let row = y + 2 + i as u16;
        frame.paint_text(x + 2, row, line, body, x + w - 1);
    }
    let bw = width_u16(&button);
    frame.paint_text(x + (w - bw) / 2, y + h - 1, &button, theme.menu_selected.style(), x + w);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
