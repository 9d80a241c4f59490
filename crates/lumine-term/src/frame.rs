// SPDX-License-Identifier: MIT
//
// FrameBuffer — the cell grid every widget paints into.
//
// Row-major `Vec<Cell>`, so one row is a contiguous slice and the renderer
// can compare whole rows at once. Painting is clipped to the buffer; text
// painting knows about double-width characters and keeps the continuation
// cells consistent when something is painted over half of one.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── Style ───────────────────────────────────────────────────────────────────

/// Foreground, background and attributes applied together by paint calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Style {
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor) -> Self {
        Self {
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Swap foreground and background.
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            fg: self.bg,
            bg: self.fg,
            attrs: self.attrs,
        }
    }
}

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// A `width × height` grid of cells.
///
/// ```
/// use lumine_term::cell::Cell;
/// use lumine_term::frame::FrameBuffer;
///
/// let mut frame = FrameBuffer::new(10, 2);
/// frame.set(3, 1, Cell::new('x'));
/// assert_eq!(frame.get(3, 1).and_then(|c| c.ch), Some('x'));
/// assert!(frame.get(10, 0).is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        (x < self.width && y < self.height).then(|| &self.cells[self.index(x, y)])
    }

    /// One row as a slice, or `None` past the bottom.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Reset every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Change dimensions. Content is discarded.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(usize::from(width) * usize::from(height), Cell::EMPTY);
    }

    /// Overwrite a single cell. Returns `false` when out of bounds.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.detach_wide(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Change only the style of an existing cell, keeping its character.
    pub fn restyle(&mut self, x: u16, y: u16, style: Style) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            let cell = &mut self.cells[idx];
            cell.fg = style.fg;
            cell.bg = style.bg;
            cell.attrs = style.attrs;
        }
    }

    /// Fill a rectangle with spaces in `style`. Clipped to the buffer.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                let idx = self.index(col, row);
                self.cells[idx] = Cell::styled(' ', style.fg, style.bg, style.attrs);
            }
        }
    }

    /// Paint `text` left to right from `(x, y)`, stopping at `max_x`
    /// (exclusive) or the right edge. Zero-width characters are skipped.
    /// Returns the number of columns used.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style, max_x: u16) -> u16 {
        let limit = max_x.min(self.width);
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if col >= limit {
                break;
            }
            if w == 2 && col + 1 >= limit {
                // Half a wide char is garbage on every terminal.
                self.set(col, y, Cell::styled(' ', style.fg, style.bg, style.attrs));
                col += 1;
                break;
            }
            self.set(col, y, Cell::styled(ch, style.fg, style.bg, style.attrs));
            if w == 2 {
                self.set(
                    col + 1,
                    y,
                    Cell::continuation(style.fg, style.bg, style.attrs),
                );
            }
            #[allow(clippy::cast_possible_truncation)]
            let advance = w as u16;
            col += advance;
        }
        col - x
    }

    /// Make a copy of `other` without reallocating when sizes match.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            *self = other.clone();
        }
    }

    /// Break up a wide character overlapping `(x, y)` before it is overwritten.
    fn detach_wide(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].is_continuation() && x > 0 {
            self.cells[idx - 1].ch = Some(' ');
        }
        if x + 1 < self.width && self.cells[idx + 1].is_continuation() {
            self.cells[idx + 1].ch = Some(' ');
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ──────────────────────────────────────────────────────────────

/// Columns a character occupies: 0 for control characters, 2 for wide.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Sum of [`char_width`] over a string.
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row_text(frame: &FrameBuffer, y: u16) -> String {
        frame
            .row(y)
            .unwrap()
            .iter()
            .filter_map(|c| c.ch)
            .collect()
    }

    #[test]
    fn new_is_blank() {
        let frame = FrameBuffer::new(4, 2);
        assert_eq!(row_text(&frame, 0), "    ");
        assert_eq!(row_text(&frame, 1), "    ");
        assert!(frame.row(2).is_none());
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut frame = FrameBuffer::new(2, 2);
        assert!(!frame.set(2, 0, Cell::new('x')));
        assert!(!frame.set(0, 2, Cell::new('x')));
        assert!(frame.set(1, 1, Cell::new('x')));
    }

    #[test]
    fn paint_text_respects_limit() {
        let mut frame = FrameBuffer::new(10, 1);
        let used = frame.paint_text(1, 0, "hello", Style::default(), 4);
        assert_eq!(used, 3);
        assert_eq!(row_text(&frame, 0), " hel      ");
    }

    #[test]
    fn paint_text_wide_chars_take_two_columns() {
        let mut frame = FrameBuffer::new(6, 1);
        let used = frame.paint_text(0, 0, "a中b", Style::default(), 6);
        assert_eq!(used, 4);
        assert!(frame.get(2, 0).unwrap().is_continuation());
        assert_eq!(frame.get(3, 0).unwrap().ch, Some('b'));
    }

    #[test]
    fn wide_char_at_edge_becomes_space() {
        let mut frame = FrameBuffer::new(3, 1);
        frame.paint_text(2, 0, "中", Style::default(), 3);
        assert_eq!(frame.get(2, 0).unwrap().ch, Some(' '));
    }

    #[test]
    fn overwriting_half_a_wide_char_clears_the_other_half() {
        let mut frame = FrameBuffer::new(4, 1);
        frame.paint_text(0, 0, "中", Style::default(), 4);
        frame.set(1, 0, Cell::new('x'));
        assert_eq!(row_text(&frame, 0), " x  ");
    }

    #[test]
    fn fill_rect_clips() {
        let style = Style::new(CellColor::WHITE, CellColor::BLACK);
        let mut frame = FrameBuffer::new(3, 3);
        frame.fill_rect(1, 1, 10, 10, style);
        assert_eq!(frame.get(0, 0).unwrap().bg, CellColor::Default);
        assert_eq!(frame.get(2, 2).unwrap().bg, CellColor::BLACK);
    }

    #[test]
    fn restyle_keeps_char() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.set(0, 0, Cell::new('q'));
        frame.restyle(0, 0, Style::new(CellColor::BLACK, CellColor::WHITE));
        let cell = frame.get(0, 0).unwrap();
        assert_eq!(cell.ch, Some('q'));
        assert_eq!(cell.bg, CellColor::WHITE);
    }

    #[test]
    fn resize_discards_content() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.set(0, 0, Cell::new('x'));
        frame.resize(3, 1);
        assert_eq!(frame.width(), 3);
        assert_eq!(row_text(&frame, 0), "   ");
    }

    #[test]
    fn inverted_style_swaps_colors() {
        let s = Style::new(CellColor::WHITE, CellColor::BLACK).inverted();
        assert_eq!(s.fg, CellColor::BLACK);
        assert_eq!(s.bg, CellColor::WHITE);
    }

    #[test]
    fn widths() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('中'), 2);
        assert_eq!(char_width('\t'), 0);
        assert_eq!(string_width("a中b"), 4);
    }
}
