// SPDX-License-Identifier: MIT
//
// Cell — one character position on screen.
//
// A frame is a grid of cells. Each cell holds the character to draw plus its
// resolved colors and SGR attributes. Wide characters (CJK, some emoji) take
// two columns: the first cell holds the character, the second is a
// continuation cell that only carries colors so the background fills.

use crate::color::CellColor;

// ─── Attributes ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text attributes.
    ///
    /// ```
    /// use lumine_term::cell::Attr;
    ///
    /// let a = Attr::BOLD | Attr::UNDERLINE;
    /// assert!(a.contains(Attr::BOLD));
    /// assert!(!a.contains(Attr::INVERSE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD      = 1 << 0;
        /// SGR 2.
        const DIM       = 1 << 1;
        /// SGR 3.
        const ITALIC    = 1 << 2;
        /// SGR 4.
        const UNDERLINE = 1 << 3;
        /// SGR 7.
        const INVERSE   = 1 << 4;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character, or `None` for the second column of a wide character.
    pub ch: Option<char>,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A space with default colors.
    pub const EMPTY: Self = Self {
        ch: Some(' '),
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: Some(ch),
            ..Self::EMPTY
        }
    }

    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: Some(ch),
            fg,
            bg,
            attrs,
        }
    }

    /// The trailing half of a wide character.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: None,
            fg,
            bg,
            attrs,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch.is_none()
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(ch) = self.ch else {
            return f.write_str("Cell(continuation)");
        };
        write!(f, "Cell({ch:?}")?;
        if !self.fg.is_default() {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if !self.bg.is_default() {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        f.write_str(")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_is_default_space() {
        assert_eq!(Cell::default(), Cell::new(' '));
        assert!(!Cell::EMPTY.is_continuation());
    }

    #[test]
    fn builders_replace_one_field() {
        let c = Cell::new('x')
            .with_fg(CellColor::WHITE)
            .with_bg(CellColor::BLACK)
            .with_attrs(Attr::BOLD);
        assert_eq!(c, Cell::styled('x', CellColor::WHITE, CellColor::BLACK, Attr::BOLD));
    }

    #[test]
    fn continuation_has_no_char() {
        let c = Cell::continuation(CellColor::WHITE, CellColor::BLACK, Attr::empty());
        assert!(c.is_continuation());
        assert_eq!(format!("{c:?}"), "Cell(continuation)");
    }

    #[test]
    fn debug_lists_only_non_default_fields() {
        assert_eq!(format!("{:?}", Cell::new('a')), "Cell('a')");
        let c = Cell::new('a').with_fg(CellColor::Rgb(1, 2, 3));
        assert_eq!(format!("{c:?}"), "Cell('a', fg=#010203)");
    }
}
