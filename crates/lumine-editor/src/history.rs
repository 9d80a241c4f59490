//! Undo/redo history: transaction-based edit tracking.
//!
//! Every buffer mutation is recorded as a reversible `Edit` inside a
//! `Transaction`, the unit undo and redo act on.
//!
//! Two ways in:
//!
//! ```text
//! // one-off action (paste, delete selection, newline):
//! history.begin(cursor_before);
//! history.record_delete(pos, removed);
//! history.record_insert(pos, text);
//! history.commit(cursor_after);
//!
//! // plain typing, merged into the open typing group:
//! history.record_typed(pos, "a", cursor_before, cursor_after);
//! ```
//!
//! A typing group stays open while each new character lands right after
//! the previous one. Any other action (a motion, a `begin`, undo/redo)
//! seals it. Empty transactions are dropped.

use crate::buffer::{Buffer, BufferError};
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    /// Undo deletes it, redo inserts it.
    Insert { pos: Position, text: String },
    /// Undo inserts it back, redo deletes it again.
    Delete { pos: Position, text: String },
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Transaction {
    edits: Vec<Edit>,
    cursor_before: Position,
    cursor_after: Position,
    typing: bool,
}

impl Transaction {
    const fn new(cursor: Position, typing: bool) -> Self {
        Self {
            edits: Vec::new(),
            cursor_before: cursor,
            cursor_after: cursor,
            typing,
        }
    }

    fn undo(&self, buf: &mut Buffer) -> Result<(), BufferError> {
        for edit in self.edits.iter().rev() {
            match edit {
                Edit::Insert { pos, text } => {
                    buf.delete(Range::ordered(*pos, pos.advanced_by(text)))?;
                }
                Edit::Delete { pos, text } => {
                    buf.insert(*pos, text)?;
                }
            }
        }
        Ok(())
    }

    fn redo(&self, buf: &mut Buffer) -> Result<(), BufferError> {
        for edit in &self.edits {
            match edit {
                Edit::Insert { pos, text } => {
                    buf.insert(*pos, text)?;
                }
                Edit::Delete { pos, text } => {
                    buf.delete(Range::ordered(*pos, pos.advanced_by(text)))?;
                }
            }
        }
        Ok(())
    }

    /// True when `pos` continues the last typed insert.
    fn continues_typing(&self, pos: Position) -> bool {
        self.typing
            && matches!(
                self.edits.last(),
                Some(Edit::Insert { pos: at, text }) if at.advanced_by(text) == pos
            )
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Linear undo/redo stacks. A new edit after an undo discards the redo
/// stack; there is no branching.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    pending: Option<Transaction>,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: None,
        }
    }

    /// Forget everything. Used when a new document replaces the buffer.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }

    /// Open a transaction, sealing whatever was pending.
    pub fn begin(&mut self, cursor: Position) {
        self.seal();
        self.pending = Some(Transaction::new(cursor, false));
    }

    /// Record text already inserted at `pos`. Ignored with nothing pending.
    pub fn record_insert(&mut self, pos: Position, text: &str) {
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Insert {
                pos,
                text: text.to_string(),
            });
        }
    }

    /// Record `text` just removed from `pos`. Ignored with nothing pending.
    pub fn record_delete(&mut self, pos: Position, text: &str) {
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Delete {
                pos,
                text: text.to_string(),
            });
        }
    }

    /// Close the open transaction with the caret where it ended up.
    pub fn commit(&mut self, cursor: Position) {
        if let Some(txn) = &mut self.pending {
            txn.cursor_after = cursor;
        }
        self.seal();
    }

    /// Record a typed insert, extending the open typing group when the text
    /// lands where the previous keystroke ended.
    pub fn record_typed(&mut self, pos: Position, text: &str, before: Position, after: Position) {
        let extends = self
            .pending
            .as_ref()
            .is_some_and(|txn| txn.continues_typing(pos));
        if !extends {
            self.seal();
            self.pending = Some(Transaction::new(before, true));
        }
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit::Insert {
                pos,
                text: text.to_string(),
            });
            txn.cursor_after = after;
        }
    }

    /// Push the pending transaction onto the undo stack, if it did anything.
    pub fn seal(&mut self) {
        if let Some(txn) = self.pending.take() {
            if !txn.edits.is_empty() {
                self.redo_stack.clear();
                self.undo_stack.push(txn);
            }
        }
    }

    /// Revert the last transaction. Returns the caret to restore, or `None`
    /// with nothing to undo.
    ///
    /// # Errors
    ///
    /// Fails only if the buffer was changed behind the history's back.
    pub fn undo(&mut self, buf: &mut Buffer) -> Result<Option<Position>, BufferError> {
        self.seal();
        let Some(txn) = self.undo_stack.pop() else {
            return Ok(None);
        };
        txn.undo(buf)?;
        let cursor = txn.cursor_before;
        self.redo_stack.push(txn);
        Ok(Some(cursor))
    }

    /// Re-apply the last undone transaction.
    ///
    /// # Errors
    ///
    /// Fails only if the buffer was changed behind the history's back.
    pub fn redo(&mut self, buf: &mut Buffer) -> Result<Option<Position>, BufferError> {
        self.seal();
        let Some(txn) = self.redo_stack.pop() else {
            return Ok(None);
        };
        txn.redo(buf)?;
        let cursor = txn.cursor_after;
        self.undo_stack.push(txn);
        Ok(Some(cursor))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending.as_ref().is_some_and(|t| !t.edits.is_empty())
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Transactions on the undo stack, not counting the pending one.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
