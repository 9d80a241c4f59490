//! The path prompt: a one-line input at the bottom of the screen that asks
//! for a file name when opening or saving under a new name.
//!
//! Enter hands the typed path back; Escape or an empty line cancels without
//! a word.

use std::path::PathBuf;

use lumine_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::locale::LocaleKey;

/// What the path is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Open,
    SaveAs,
}

impl PromptPurpose {
    /// Label drawn before the input.
    #[must_use]
    pub const fn label(self) -> LocaleKey {
        match self {
            Self::Open => LocaleKey::OpenPrompt,
            Self::SaveAs => LocaleKey::SavePrompt,
        }
    }
}

/// Result of feeding the prompt one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still editing.
    Pending,
    Submit(PathBuf),
    Cancel,
}

#[derive(Debug, Clone)]
pub struct PathPrompt {
    purpose: PromptPurpose,
    input: String,
    /// Char offset into `input`.
    cursor: usize,
}

impl PathPrompt {
    #[must_use]
    pub const fn new(purpose: PromptPurpose) -> Self {
        Self {
            purpose,
            input: String::new(),
            cursor: 0,
        }
    }

    /// Start with `text` filled in and the cursor after it.
    #[must_use]
    pub fn with_text(purpose: PromptPurpose, text: &str) -> Self {
        Self {
            purpose,
            input: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn purpose(&self) -> PromptPurpose {
        self.purpose
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome {
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Escape => return PromptOutcome::Cancel,
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                self.insert_char(ch);
            }
            _ => {}
        }
        PromptOutcome::Pending
    }

    /// Insert pasted text, dropping line breaks.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(ch);
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_at(self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_at(self.cursor);
            self.input.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_at(self.cursor);
            self.input.remove(at);
        }
    }

    fn submit(&self) -> PromptOutcome {
        let path = self.input.trim();
        if path.is_empty() {
            PromptOutcome::Cancel
        } else {
            PromptOutcome::Submit(PathBuf::from(path))
        }
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
