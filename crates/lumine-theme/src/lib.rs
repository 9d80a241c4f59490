//! # lumine-theme — the Theme Applier
//!
//! Lumine IDE ships exactly two palettes, light and dark. There is no
//! custom palette support: a [`ThemeName`] fully determines every color the
//! editor draws, from the text area and gutter to the six syntax tag colors.
//!
//! Colors are stored as terminal-ready [`CellColor`](lumine_term::color::CellColor)
//! values, so rendering reads fields and never converts anything.

pub mod builtin;
pub mod highlight;
pub mod syntax;

pub use builtin::ThemeName;
pub use highlight::{HighlightGroup, Theme};
pub use syntax::{SyntaxPalette, Tag};
