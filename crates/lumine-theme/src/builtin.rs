//! The two built-in palettes and the name that selects between them.

use std::fmt;

use lumine_term::cell::Attr;
use lumine_term::color::CellColor;
use serde::{Deserialize, Serialize};

use crate::highlight::{HighlightGroup, Theme};
use crate::syntax::SyntaxPalette;

/// Which palette to use. Persisted as `"light"` / `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    #[default]
    Dark,
}

impl ThemeName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn group(fg: &str, bg: &str) -> HighlightGroup {
    HighlightGroup::fg_bg(CellColor::hex(fg), CellColor::hex(bg))
}

/// White paper, black ink.
#[must_use]
pub const fn light() -> Theme {
    Theme {
        name: ThemeName::Light,
        background: CellColor::WHITE,
        foreground: CellColor::BLACK,
        cursor: CellColor::BLACK,
        selection: HighlightGroup::fg_bg(CellColor::BLACK, CellColor::hex("#a6c2ff")),
        gutter: HighlightGroup::fg_bg(CellColor::BLACK, CellColor::LIGHT_GRAY),
        menu_bar: group("#000000", "#F0F0F0"),
        menu_selected: HighlightGroup::fg_bg(CellColor::BLACK, CellColor::hex("#a6c2ff")),
        menu: group("#000000", "#F0F0F0"),
        toolbar: group("#000000", "#E4E4E4"),
        status_line: HighlightGroup::fg_bg(CellColor::BLACK, CellColor::LIGHT_GRAY),
        dialog: group("#000000", "#F0F0F0"),
        dialog_title: group("#FFFFFF", "#3C6EB4").with_attrs(Attr::BOLD),
        error_title: group("#FFFFFF", "#B42828").with_attrs(Attr::BOLD),
        syntax: SyntaxPalette {
            keyword: CellColor::hex("#0000FF"),
            function: CellColor::hex("#CC00FF"),
            string: CellColor::hex("#008000"),
            comment: CellColor::hex("#808080"),
            number: CellColor::hex("#FF8000"),
            decorator: CellColor::hex("#AA5500"),
        },
    }
}

/// Dark grey editor, soft foreground.
#[must_use]
pub const fn dark() -> Theme {
    Theme {
        name: ThemeName::Dark,
        background: CellColor::hex("#1E1E1E"),
        foreground: CellColor::hex("#D4D4D4"),
        cursor: CellColor::WHITE,
        selection: HighlightGroup::fg_bg(CellColor::WHITE, CellColor::hex("#264f78")),
        gutter: group("#D4D4D4", "#252526"),
        menu_bar: group("#D4D4D4", "#3C3C3C"),
        menu_selected: HighlightGroup::fg_bg(CellColor::WHITE, CellColor::hex("#264f78")),
        menu: group("#D4D4D4", "#252526"),
        toolbar: group("#D4D4D4", "#333333"),
        status_line: group("#D4D4D4", "#252526"),
        dialog: group("#D4D4D4", "#2D2D30"),
        dialog_title: group("#FFFFFF", "#264f78").with_attrs(Attr::BOLD),
        error_title: group("#FFFFFF", "#A1260D").with_attrs(Attr::BOLD),
        syntax: SyntaxPalette {
            keyword: CellColor::hex("#569CD6"),
            function: CellColor::hex("#DCDCAA"),
            string: CellColor::hex("#CE9178"),
            comment: CellColor::hex("#6A9955"),
            number: CellColor::hex("#B5CEA8"),
            decorator: CellColor::hex("#C586C0"),
        },
    }
}
