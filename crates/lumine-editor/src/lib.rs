//! # lumine-editor: editor core for Lumine IDE
//!
//! Everything the shell needs apart from the terminal and the palettes:
//!
//! - **[`position`]**: `Position` (line, col) and `Range`, 0-indexed
//! - **[`buffer`]**: `Buffer` wrapping a rope, with editing and file I/O
//! - **[`cursor`]**: caret with sticky column and Shift-selection anchor
//! - **[`history`]**: undo and redo stacks of edit transactions
//! - **[`highlight`]**: the six-pattern regex highlighter
//! - **[`locale`]**: English and Turkish UI strings
//! - **[`settings`]**: `settings.json` load and save
//! - **[`menu`]**: menu bar, toolbar and drop-down navigation
//! - **[`prompt`]**: the one-line path prompt
//! - **[`view`]**: painting all of the above into a frame

pub mod buffer;
pub mod cursor;
pub mod highlight;
pub mod history;
pub mod locale;
pub mod menu;
pub mod position;
pub mod prompt;
pub mod settings;
pub mod view;

pub use buffer::{Buffer, BufferError};
pub use highlight::{Highlighter, Span};
pub use locale::{Language, LocaleKey, LocaleMap};
pub use settings::{Settings, SettingsStore};
