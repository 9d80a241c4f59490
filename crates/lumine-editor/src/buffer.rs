//! Text buffer: the single document Lumine edits.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and adds coordinate conversion between
//! [`Position`] (line, col) and rope char indices, file I/O, and the backing
//! path the shell shows in the title.
//!
//! Text is written back exactly as it sits in the rope. Line endings are
//! never rewritten, so a file opened and saved unchanged is byte-identical.
//!
//! Editing methods return [`BufferError::OutOfBounds`] instead of panicking
//! when handed a position past the end of the text.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("position {0} is outside the buffer")]
    OutOfBounds(Position),

    #[error("no file name")]
    NoPath,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BufferError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A rope-backed text buffer with an optional file path.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty, unnamed buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
        }
    }

    /// Read a UTF-8 file and attach `path`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Io`] when the file can't be read or isn't UTF-8.
    pub fn from_file(path: &Path) -> Result<Self, BufferError> {
        let file = File::open(path).map_err(|e| BufferError::io(path, e))?;
        let rope = Rope::from_reader(io::BufReader::new(file)).map_err(|e| BufferError::io(path, e))?;
        tracing::debug!(path = %path.display(), chars = rope.len_chars(), "loaded file");
        Ok(Self {
            rope,
            path: Some(path.to_path_buf()),
        })
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines: one more than the number of line breaks. An empty
    /// buffer has one (empty) line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// A line including its trailing line break, if any.
    #[inline]
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        (line < self.rope.len_lines()).then(|| self.rope.line(line))
    }

    /// Char index of the first char of `line`.
    #[inline]
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_char(line))
    }

    /// Chars in a line, not counting `\n`, `\r\n` or `\r` at the end.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|l| {
            let total = l.len_chars();
            match (total.checked_sub(1).map(|i| l.char(i)), total) {
                (Some('\n'), t) if t >= 2 && l.char(t - 2) == '\r' => t - 2,
                (Some('\n' | '\r'), t) => t - 1,
                (_, t) => t,
            }
        })
    }

    /// The whole text. Allocates.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// `(line, col)` to an absolute char index. `col` may equal the line's
    /// full length (one past its last char).
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(pos.line);
        (pos.col <= self.rope.line(pos.line).len_chars()).then_some(start + pos.col)
    }

    /// Absolute char index to `(line, col)`. `len_chars()` itself is valid.
    #[must_use]
    pub fn char_idx_to_pos(&self, idx: usize) -> Option<Position> {
        if idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(idx);
        Some(Position::new(line, idx - self.rope.line_to_char(line)))
    }

    /// Nearest valid caret position: last line at most, and no further right
    /// than the end of the line's content.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        let col = pos.col.min(self.line_content_len(line).unwrap_or(0));
        Position::new(line, col)
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `pos`. Returns the position just after it.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] when `pos` is not in the buffer.
    pub fn insert(&mut self, pos: Position, text: &str) -> Result<Position, BufferError> {
        let idx = self.pos_to_char_idx(pos).ok_or(BufferError::OutOfBounds(pos))?;
        if !text.is_empty() {
            self.rope.insert(idx, text);
        }
        self.char_idx_to_pos(idx + text.chars().count())
            .ok_or(BufferError::OutOfBounds(pos))
    }

    /// Remove the text in `range` and hand it back.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] when either end is not in the buffer.
    pub fn delete(&mut self, range: Range) -> Result<String, BufferError> {
        let start = self
            .pos_to_char_idx(range.start)
            .ok_or(BufferError::OutOfBounds(range.start))?;
        let end = self
            .pos_to_char_idx(range.end)
            .ok_or(BufferError::OutOfBounds(range.end))?;
        if start == end {
            return Ok(String::new());
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        Ok(removed)
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Final component of the path, for the title.
    #[must_use]
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }

    // -- File I/O -----------------------------------------------------------

    /// Write to the attached path.
    ///
    /// # Errors
    ///
    /// [`BufferError::NoPath`] for an unnamed buffer, otherwise the write
    /// failure.
    pub fn save(&mut self) -> Result<(), BufferError> {
        let path = self.path.clone().ok_or(BufferError::NoPath)?;
        self.save_as(&path)
    }

    /// Write to `path` and attach it. On failure the old path is kept.
    ///
    /// # Errors
    ///
    /// [`BufferError::Io`] when the file can't be created or written.
    pub fn save_as(&mut self, path: &Path) -> Result<(), BufferError> {
        self.write_to(path).map_err(|e| BufferError::io(path, e))?;
        tracing::info!(path = %path.display(), bytes = self.rope.len_bytes(), "saved file");
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(fs::File::create(path)?);
        self.rope.write_to(&mut out)?;
        out.flush()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("path", &self.path)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_has_one_empty_line() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.path(), None);
    }

    #[test]
    fn trailing_newline_adds_a_line() {
        assert_eq!(Buffer::from_text("a\nb").line_count(), 2);
        assert_eq!(Buffer::from_text("a\nb\n").line_count(), 3);
    }

    #[test]
    fn only_cr_and_lf_break_lines() {
        let buf = Buffer::from_text("a\x0cb\u{85}c\u{2028}d\r\ne\rf");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_content_len(0), Some(7));
        assert_eq!(buf.char_idx_to_pos(7), Some(pos(0, 7)));
    }

    // -- Line queries -------------------------------------------------------

    #[test]
    fn line_content_len_strips_any_break() {
        let buf = Buffer::from_text("ab\ncd\r\nef\rgh");
        assert_eq!(buf.line_content_len(0), Some(2));
        assert_eq!(buf.line_content_len(1), Some(2));
        assert_eq!(buf.line_content_len(2), Some(2));
        assert_eq!(buf.line_content_len(3), Some(2));
        assert_eq!(buf.line_content_len(4), None);
    }

    #[test]
    fn line_start_is_a_char_index() {
        let buf = Buffer::from_text("çay\nsu\n");
        assert_eq!(buf.line_start(0), Some(0));
        assert_eq!(buf.line_start(1), Some(4));
        assert_eq!(buf.line_start(2), Some(7));
        assert_eq!(buf.line_start(3), None);
    }

    // -- Coordinates --------------------------------------------------------

    #[test]
    fn pos_and_index_agree() {
        let buf = Buffer::from_text("ab\ncde\n");
        for idx in 0..=buf.len_chars() {
            let p = buf.char_idx_to_pos(idx).unwrap();
            assert_eq!(buf.pos_to_char_idx(p), Some(idx));
        }
        assert_eq!(buf.char_idx_to_pos(buf.len_chars() + 1), None);
    }

    #[test]
    fn pos_past_line_end_is_rejected() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.pos_to_char_idx(pos(0, 3)), Some(3));
        assert_eq!(buf.pos_to_char_idx(pos(0, 4)), None);
        assert_eq!(buf.pos_to_char_idx(pos(2, 0)), None);
    }

    #[test]
    fn clamp_position_pulls_back_inside() {
        let buf = Buffer::from_text("hello\nhi");
        assert_eq!(buf.clamp_position(pos(0, 99)), pos(0, 5));
        assert_eq!(buf.clamp_position(pos(9, 9)), pos(1, 2));
        assert_eq!(Buffer::new().clamp_position(pos(3, 3)), Position::ZERO);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_returns_end_position() {
        let mut buf = Buffer::from_text("hd");
        let end = buf.insert(pos(0, 1), "ello\nworl").unwrap();
        assert_eq!(end, pos(1, 4));
        assert_eq!(buf.contents(), "hello\nworld");
    }

    #[test]
    fn insert_empty_is_noop() {
        let mut buf = Buffer::from_text("x");
        assert_eq!(buf.insert(pos(0, 1), "").unwrap(), pos(0, 1));
        assert_eq!(buf.contents(), "x");
    }

    #[test]
    fn insert_out_of_bounds_is_an_error() {
        let mut buf = Buffer::from_text("abc");
        assert!(matches!(
            buf.insert(pos(4, 0), "x"),
            Err(BufferError::OutOfBounds(p)) if p == pos(4, 0)
        ));
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn delete_returns_removed_text() {
        let mut buf = Buffer::from_text("hello\nworld");
        let removed = buf.delete(Range::ordered(pos(0, 4), pos(1, 1))).unwrap();
        assert_eq!(removed, "o\nw");
        assert_eq!(buf.contents(), "hellorld");
    }

    #[test]
    fn delete_empty_range_is_noop() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.delete(Range::point(pos(0, 1))).unwrap(), "");
        assert_eq!(buf.contents(), "abc");
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.py");

        let mut buf = Buffer::from_text("def f():\n    pass\n");
        buf.save_as(&path).unwrap();
        assert_eq!(buf.path(), Some(path.as_path()));
        assert_eq!(buf.file_name().as_deref(), Some("roundtrip.py"));

        let loaded = Buffer::from_file(&path).unwrap();
        assert_eq!(loaded.contents(), "def f():\n    pass\n");
        assert_eq!(loaded.path(), Some(path.as_path()));
    }

    #[test]
    fn save_keeps_line_endings_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.txt");

        let mut buf = Buffer::from_text("a\r\nb\nc\r");
        buf.save_as(&path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a\r\nb\nc\r");
    }

    #[test]
    fn save_without_path_errors() {
        let mut buf = Buffer::from_text("hello");
        assert!(matches!(buf.save(), Err(BufferError::NoPath)));
    }

    #[test]
    fn failed_save_as_keeps_old_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("missing-dir").join("bad.txt");

        let mut buf = Buffer::from_text("x");
        buf.save_as(&good).unwrap();
        buf.insert(Position::ZERO, "y").unwrap();

        let err = buf.save_as(&bad).unwrap_err();
        assert!(err.to_string().contains("bad.txt"));
        assert_eq!(buf.path(), Some(good.as_path()));
        assert_eq!(fs::read(&good).unwrap(), b"x");
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Buffer::from_file(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(BufferError::Io { .. })));
    }

    #[test]
    fn from_file_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(Buffer::from_file(&path).is_err());
    }
}
