//! Theme assembly — the resolved style of every element the editor draws.

use lumine_term::cell::Attr;
use lumine_term::color::CellColor;
use lumine_term::frame::Style;

use crate::builtin::{self, ThemeName};
use crate::syntax::{SyntaxPalette, Tag};

// ---------------------------------------------------------------------------
// HighlightGroup
// ---------------------------------------------------------------------------

/// Foreground, background and attributes for one UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightGroup {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl HighlightGroup {
    #[must_use]
    pub const fn fg_bg(fg: CellColor, bg: CellColor) -> Self {
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

    /// As a paint style for the frame buffer.
    #[must_use]
    pub const fn style(self) -> Style {
        Style::new(self.fg, self.bg).with_attrs(self.attrs)
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A complete, fixed palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,

    // ── Buffer display ────────────────────────────────────────
    /// Text area background.
    pub background: CellColor,
    /// Text area foreground.
    pub foreground: CellColor,
    /// Insertion cursor.
    pub cursor: CellColor,
    /// Selected text.
    pub selection: HighlightGroup,

    // ── Gutter ────────────────────────────────────────────────
    pub gutter: HighlightGroup,

    // ── Chrome ────────────────────────────────────────────────
    pub menu_bar: HighlightGroup,
    /// Open menu title and highlighted drop-down entry.
    pub menu_selected: HighlightGroup,
    /// Drop-down body.
    pub menu: HighlightGroup,
    pub toolbar: HighlightGroup,
    pub status_line: HighlightGroup,
    pub dialog: HighlightGroup,
    pub dialog_title: HighlightGroup,
    pub error_title: HighlightGroup,

    pub syntax: SyntaxPalette,
}

impl Theme {
    /// The fixed palette for `name`. Same input, same theme, every time.
    #[must_use]
    pub const fn for_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => builtin::light(),
            ThemeName::Dark => builtin::dark(),
        }
    }

    /// Plain text in the editing area.
    #[must_use]
    pub const fn text(&self) -> HighlightGroup {
        HighlightGroup::fg_bg(self.foreground, self.background)
    }

    /// Text colored for `tag` on the normal background.
    #[must_use]
    pub const fn tag(&self, tag: Tag) -> HighlightGroup {
        HighlightGroup::fg_bg(self.syntax.color(tag), self.background)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_name(ThemeName::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_theme_is_dark() {
        assert_eq!(Theme::default().name, ThemeName::Dark);
    }

    #[test]
    fn deterministic() {
        assert_eq!(Theme::for_name(ThemeName::Light), Theme::for_name(ThemeName::Light));
        assert_eq!(Theme::for_name(ThemeName::Dark), Theme::for_name(ThemeName::Dark));
    }

    #[test]
    fn palettes_differ() {
        let light = Theme::for_name(ThemeName::Light);
        let dark = Theme::for_name(ThemeName::Dark);
        assert_ne!(light.background, dark.background);
        for tag in Tag::ALL {
            assert_ne!(light.syntax.color(tag), dark.syntax.color(tag), "{tag:?}");
        }
    }

    #[test]
    fn tag_group_uses_text_background() {
        let t = Theme::for_name(ThemeName::Dark);
        let g = t.tag(Tag::Comment);
        assert_eq!(g.bg, t.background);
        assert_eq!(g.fg, t.syntax.comment);
    }

    #[test]
    fn group_style_carries_attrs() {
        let g = HighlightGroup::fg_bg(CellColor::WHITE, CellColor::BLACK).with_attrs(Attr::BOLD);
        let s = g.style();
        assert_eq!(s.attrs, Attr::BOLD);
        assert_eq!(s.fg, CellColor::WHITE);
    }
}
