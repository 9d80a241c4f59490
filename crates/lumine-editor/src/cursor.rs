//! Cursor: caret position, sticky column and selection anchor.
//!
//! Lumine has no modes, so the caret may always sit one past the last char
//! of a line. Horizontal moves wrap onto the neighbouring line the way a
//! text widget does. Vertical moves remember the column they started from
//! (the sticky column) so crossing a short line does not lose it.
//!
//! A selection is the span between the anchor and the caret. Shift+motion
//! drops the anchor where the caret was; a plain motion clears it.

use crate::buffer::Buffer;
use crate::position::{Position, Range};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    sticky_col: usize,
    anchor: Option<Position>,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pos: Position::ZERO,
            sticky_col: 0,
            anchor: None,
        }
    }

    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self {
            pos,
            sticky_col: pos.col,
            anchor: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// The selected range, or `None` when nothing (or nothing visible) is
    /// selected.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        self.anchor
            .map(|anchor| Range::ordered(anchor, self.pos))
            .filter(|r| !r.is_empty())
    }

    // -- Selection control --------------------------------------------------

    /// Call before a motion. With `extend`, anchor the selection at the
    /// current caret unless one is already anchored; without it, drop any
    /// selection.
    pub const fn prepare_motion(&mut self, extend: bool) {
        if !extend {
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(self.pos);
        }
    }

    pub const fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    // -- Direct positioning -------------------------------------------------

    /// Jump to `pos`, clamped to the buffer. Resets the sticky column.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer) {
        self.pos = buf.clamp_position(pos);
        self.sticky_col = self.pos.col;
    }

    // -- Horizontal movement ------------------------------------------------

    /// One char left; from column 0, to the end of the previous line.
    pub fn move_left(&mut self, buf: &Buffer) {
        let pos = buf.clamp_position(self.pos);
        self.pos = if pos.col > 0 {
            Position::new(pos.line, pos.col - 1)
        } else if pos.line > 0 {
            Position::new(pos.line - 1, line_end(buf, pos.line - 1))
        } else {
            pos
        };
        self.sticky_col = self.pos.col;
    }

    /// One char right; from the end of a line, to the start of the next.
    pub fn move_right(&mut self, buf: &Buffer) {
        let pos = buf.clamp_position(self.pos);
        self.pos = if pos.col < line_end(buf, pos.line) {
            Position::new(pos.line, pos.col + 1)
        } else if pos.line + 1 < buf.line_count() {
            Position::new(pos.line + 1, 0)
        } else {
            pos
        };
        self.sticky_col = self.pos.col;
    }

    pub const fn move_to_line_start(&mut self) {
        self.pos.col = 0;
        self.sticky_col = 0;
    }

    pub fn move_to_line_end(&mut self, buf: &Buffer) {
        self.pos.col = line_end(buf, self.pos.line);
        self.sticky_col = self.pos.col;
    }

    // -- Vertical movement --------------------------------------------------

    pub fn move_up(&mut self, count: usize, buf: &Buffer) {
        self.pos.line = self.pos.line.saturating_sub(count);
        self.pos.col = self.sticky_col.min(line_end(buf, self.pos.line));
    }

    pub fn move_down(&mut self, count: usize, buf: &Buffer) {
        let last = buf.line_count().saturating_sub(1);
        self.pos.line = (self.pos.line + count).min(last);
        self.pos.col = self.sticky_col.min(line_end(buf, self.pos.line));
    }

    /// Ctrl+Home.
    pub const fn move_to_start(&mut self) {
        self.pos = Position::ZERO;
        self.sticky_col = 0;
    }

    /// Ctrl+End.
    pub fn move_to_end(&mut self, buf: &Buffer) {
        let last = buf.line_count().saturating_sub(1);
        self.pos = Position::new(last, line_end(buf, last));
        self.sticky_col = self.pos.col;
    }

    // -- Clamping -----------------------------------------------------------

    /// Pull the caret and anchor back inside the buffer after it shrank.
    pub fn clamp(&mut self, buf: &Buffer) {
        self.pos = buf.clamp_position(self.pos);
        if let Some(anchor) = &mut self.anchor {
            *anchor = buf.clamp_position(*anchor);
        }
    }
}

fn line_end(buf: &Buffer, line: usize) -> usize {
    buf.line_content_len(line).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
