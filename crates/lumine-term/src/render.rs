// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is compared with the one before it and only changed cells are
// written. Output goes into one in-memory buffer and reaches the terminal
// in a single write, bracketed by synchronized-output markers. While
// writing, the renderer remembers the cursor position and the active SGR
// state so consecutive cells with the same style cost one byte each.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;
use crate::frame::FrameBuffer;

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// What the terminal currently has selected, as far as we know.
#[derive(Debug, Clone, Copy)]
struct Pen {
    next: Option<(u16, u16)>,
    fg: Option<CellColor>,
    bg: Option<CellColor>,
    attrs: Attr,
}

impl Pen {
    const UNKNOWN: Self = Self {
        next: None,
        fg: None,
        bg: None,
        attrs: Attr::empty(),
    };

    fn draw(&mut self, out: &mut Vec<u8>, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.next != Some((x, y)) {
            ansi::cursor_to(out, x, y)?;
        }

        if cell.attrs != self.attrs {
            if !self.attrs.is_empty() {
                ansi::reset(out)?;
                self.fg = None;
                self.bg = None;
            }
            ansi::attrs(out, cell.attrs)?;
            self.attrs = cell.attrs;
        }
        if self.fg != Some(cell.fg) {
            ansi::fg(out, cell.fg)?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            ansi::bg(out, cell.bg)?;
            self.bg = Some(cell.bg);
        }

        match cell.ch {
            Some(ch) => {
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                self.next = Some((x + 1, y));
            }
            // The wide char to our left already covered this column, unless
            // it was skipped because it didn't change.
            None if self.next == Some((x, y)) => {}
            None => {
                out.push(b' ');
                self.next = Some((x + 1, y));
            }
        }
        Ok(())
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Counts from one [`DiffRenderer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_written: usize,
    pub cells_skipped: usize,
}

/// Emits the ANSI needed to turn the previous frame into the current one.
pub struct DiffRenderer {
    out: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(16 * 1024),
            previous: None,
        }
    }

    /// Diff `frame` against the last rendered frame into the output buffer.
    ///
    /// # Errors
    ///
    /// Only if encoding fails, which writing into a `Vec` never does.
    pub fn render(&mut self, frame: &FrameBuffer) -> io::Result<RenderStats> {
        self.out.clear();
        let mut stats = RenderStats::default();
        let mut pen = Pen::UNKNOWN;

        let prev = self
            .previous
            .as_ref()
            .filter(|p| p.width() == frame.width() && p.height() == frame.height());

        ansi::begin_sync(&mut self.out)?;
        if prev.is_none() {
            ansi::reset(&mut self.out)?;
            ansi::clear_screen(&mut self.out)?;
        }

        for y in 0..frame.height() {
            let Some(row) = frame.row(y) else { break };
            let old_row = prev.and_then(|p| p.row(y));
            if old_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }
            for (x, cell) in (0u16..).zip(row) {
                if old_row.and_then(|r| r.get(usize::from(x))) == Some(cell) {
                    stats.cells_skipped += 1;
                    continue;
                }
                pen.draw(&mut self.out, x, y, cell)?;
                stats.cells_written += 1;
            }
        }

        ansi::reset(&mut self.out)?;
        ansi::end_sync(&mut self.out)?;

        match &mut self.previous {
            Some(p) => p.copy_from(frame),
            None => self.previous = Some(frame.clone()),
        }
        Ok(stats)
    }

    /// Bytes produced by the last [`render`](Self::render).
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    /// Write the pending output to `w` and clear it.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.out.is_empty() {
            w.write_all(&self.out)?;
            w.flush()?;
            self.out.clear();
        }
        Ok(())
    }

    /// Forget the previous frame so the next render repaints everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Style;
    use pretty_assertions::assert_eq;

    fn text(r: &DiffRenderer) -> String {
        String::from_utf8_lossy(r.output()).into_owned()
    }

    #[test]
    fn first_frame_writes_everything() {
        let mut r = DiffRenderer::new();
        let frame = FrameBuffer::new(3, 2);
        let stats = r.render(&frame).unwrap();
        assert_eq!(stats.cells_written, 6);
        assert!(text(&r).contains("\x1b[2J"));
    }

    #[test]
    fn identical_frame_writes_no_cells() {
        let mut r = DiffRenderer::new();
        let frame = FrameBuffer::new(3, 2);
        r.render(&frame).unwrap();
        let stats = r.render(&frame).unwrap();
        assert_eq!(stats, RenderStats { cells_written: 0, cells_skipped: 6 });
        assert!(!text(&r).contains("\x1b[2J"));
    }

    #[test]
    fn only_changed_cell_is_written() {
        let mut r = DiffRenderer::new();
        let mut frame = FrameBuffer::new(4, 2);
        r.render(&frame).unwrap();
        frame.set(2, 1, Cell::new('z'));
        let stats = r.render(&frame).unwrap();
        assert_eq!(stats.cells_written, 1);
        assert!(text(&r).contains("\x1b[2;3H\x1b[39m\x1b[49mz"));
    }

    #[test]
    fn same_style_run_emits_colors_once() {
        let mut r = DiffRenderer::new();
        let mut frame = FrameBuffer::new(5, 1);
        let style = Style::new(CellColor::Rgb(1, 1, 1), CellColor::Rgb(2, 2, 2));
        frame.paint_text(0, 0, "abcde", style, 5);
        r.render(&frame).unwrap();
        assert_eq!(text(&r).matches("38;2;1;1;1").count(), 1);
        assert!(text(&r).contains("abcde"));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut r = DiffRenderer::new();
        r.render(&FrameBuffer::new(3, 3)).unwrap();
        let stats = r.render(&FrameBuffer::new(4, 3)).unwrap();
        assert_eq!(stats.cells_written, 12);
    }

    #[test]
    fn force_redraw_repaints() {
        let mut r = DiffRenderer::new();
        let frame = FrameBuffer::new(2, 2);
        r.render(&frame).unwrap();
        r.force_redraw();
        assert_eq!(r.render(&frame).unwrap().cells_written, 4);
    }

    #[test]
    fn flush_drains_output() {
        let mut r = DiffRenderer::new();
        r.render(&FrameBuffer::new(1, 1)).unwrap();
        let mut sink = Vec::new();
        r.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(r.output().is_empty());
    }
}
