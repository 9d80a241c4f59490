//! Syntax highlighting with six regular expressions.
//!
//! The [`Highlighter`] knows nothing about grammar. It runs six patterns
//! over the whole buffer text, one after another, and reports every match
//! as a [`Span`]:
//!
//! | order | tag         | pattern                                   |
//! |-------|-------------|-------------------------------------------|
//! | 1     | `keyword`   | the 35 Python keywords, word-bounded      |
//! | 2     | `function`  | an identifier, then `(`; spaces allowed   |
//! | 3     | `string`    | `"..."` or `'...'` with backslash escapes |
//! | 4     | `comment`   | `#` to end of line                        |
//! | 5     | `number`    | a run of digits, word-bounded             |
//! | 6     | `decorator` | `@` followed by an identifier             |
//!
//! Spans may overlap. Whoever paints them applies them in order, so a later
//! tag wins: a `#` inside a string turns the rest of the line into a
//! comment, and digits inside a comment show as a number.
//!
//! There is no incremental state. Every call rescans the full text, and the
//! shell calls it once per buffer change.

use regex::Regex;

pub use lumine_theme::Tag;

const KEYWORD: &str = r"\b(False|None|True|and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\b";
// `regex` has no lookahead; the `\s*\(` tail is consumed but only group 1
// becomes the span. Neither whitespace nor `(` can start an identifier, so
// nested calls like `f(g(x))` still match both names.
const FUNCTION: &str = r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(";
const STRING: &str = r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#;
const COMMENT: &str = r"#.*";
const NUMBER: &str = r"\b\d+\b";
const DECORATOR: &str = r"@[A-Za-z_][A-Za-z0-9_]*";

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// One match: chars `start..end` of the buffer carry `tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub tag: Tag,
    /// Char offset, inclusive.
    pub start: usize,
    /// Char offset, exclusive.
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(tag: Tag, start: usize, end: usize) -> Self {
        Self { tag, start, end }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ---------------------------------------------------------------------------
// Highlighter
// ---------------------------------------------------------------------------

struct Rule {
    tag: Tag,
    regex: Regex,
    /// Capture group that forms the span; 0 is the whole match.
    group: usize,
}

/// The six compiled patterns.
pub struct Highlighter {
    rules: Vec<Rule>,
}

impl Highlighter {
    /// Compile the patterns. They are fixed, so this cannot fail at runtime.
    #[must_use]
    pub fn new() -> Self {
        let table = [
            (Tag::Keyword, KEYWORD, 0),
            (Tag::Function, FUNCTION, 1),
            (Tag::String, STRING, 0),
            (Tag::Comment, COMMENT, 0),
            (Tag::Number, NUMBER, 0),
            (Tag::Decorator, DECORATOR, 0),
        ];
        let rules = table
            .into_iter()
            .filter_map(|(tag, pattern, group)| match Regex::new(pattern) {
                Ok(regex) => Some(Rule { tag, regex, group }),
                Err(err) => {
                    tracing::error!(tag = tag.name(), %err, "highlight pattern rejected");
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// All spans in `text`, grouped by tag in application order and in
    /// match order within a tag.
    #[must_use]
    pub fn highlight(&self, text: &str) -> Vec<Span> {
        let ascii = text.is_ascii();
        let mut spans = Vec::new();
        for rule in &self.rules {
            let mut offsets = CharOffsets::new(text);
            for caps in rule.regex.captures_iter(text) {
                let Some(m) = caps.get(rule.group) else {
                    continue;
                };
                let (start, end) = if ascii {
                    (m.start(), m.end())
                } else {
                    (offsets.char_at(m.start()), offsets.char_at(m.end()))
                };
                spans.push(Span::new(rule.tag, start, end));
            }
        }
        tracing::trace!(bytes = text.len(), spans = spans.len(), "highlighted");
        spans
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("rules", &self.rules.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Resolve the tag of every char in `start..end`, applying `spans` in order
/// so later spans overwrite earlier ones. `None` means plain text.
#[must_use]
pub fn overlay(spans: &[Span], start: usize, end: usize) -> Vec<Option<Tag>> {
    let mut tags = vec![None; end.saturating_sub(start)];
    for span in spans {
        let from = span.start.max(start);
        let to = span.end.min(end);
        if from < to {
            tags[from - start..to - start].fill(Some(span.tag));
        }
    }
    tags
}

// ---------------------------------------------------------------------------
// Byte to char offsets
// ---------------------------------------------------------------------------

/// Converts byte offsets to char offsets for a sequence of non-decreasing
/// queries, walking the text once.
struct CharOffsets<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    const fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_at(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
