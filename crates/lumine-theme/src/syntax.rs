//! Syntax tags and the colors assigned to them.

use lumine_term::color::CellColor;

/// The lexical classes the highlighter recognizes.
///
/// Declaration order is application order: when spans of different tags
/// cover the same character, the tag listed later is drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Keyword,
    Function,
    String,
    Comment,
    Number,
    Decorator,
}

impl Tag {
    /// Every tag, in application order.
    pub const ALL: [Self; 6] = [
        Self::Keyword,
        Self::Function,
        Self::String,
        Self::Comment,
        Self::Number,
        Self::Decorator,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Function => "function",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::Decorator => "decorator",
        }
    }
}

/// Foreground color per [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxPalette {
    pub keyword: CellColor,
    pub function: CellColor,
    pub string: CellColor,
    pub comment: CellColor,
    pub number: CellColor,
    pub decorator: CellColor,
}

impl SyntaxPalette {
    #[must_use]
    pub const fn color(&self, tag: Tag) -> CellColor {
        match tag {
            Tag::Keyword => self.keyword,
            Tag::Function => self.function,
            Tag::String => self.string,
            Tag::Comment => self.comment,
            Tag::Number => self.number,
            Tag::Decorator => self.decorator,
        }
    }
}
