//! Undo/redo history.
//!
//! Edits are registered as [`EditOperation`]s between a reference-counted
//! `begin_edit`/`end_edit` pair. The outermost `end_edit` seals the pending
//! operations into one [`UndoRecord`], or folds them into the previous record
//! when both are plain single-character typing of the same character class.
//!
//! The log sits beside the buffer rather than inside it: undo and redo replay
//! operations through the buffer primitives, which record nothing.

use tracing::{debug, warn};

use super::caret::Caret;
use super::line::LineStamps;
use super::text_buffer::{TextBuffer, end_after};
use crate::base::{CharClass, Position};

/// Label attached to a record, used to decide coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndoAction {
    Typing,
    Paste,
    Delete,
    Cut,
    Replace,
    #[default]
    Other,
}

/// One splice. Either `removed` or `inserted` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    pub from: Position,
    /// End of the removed range; equals `from` for insertions
    pub to: Position,
    pub removed: String,
    pub inserted: String,
    /// Change stamp the splice applied
    pub stamp: u64,
    /// Stamps of lines `from.line..=to.line` before the splice
    pub stamps_before: Vec<LineStamps>,
}

impl EditOperation {
    /// Describe inserting `text` at `at`, capturing stamps before the splice.
    pub fn insertion(buffer: &TextBuffer, at: Position, text: &str, stamp: u64) -> Self {
        Self {
            from: at,
            to: at,
            removed: String::new(),
            inserted: text.to_string(),
            stamp,
            stamps_before: buffer.stamps_range(at.line, at.line),
        }
    }

    /// Describe deleting `from..to`, capturing the text and stamps.
    pub fn deletion(buffer: &TextBuffer, from: Position, to: Position, stamp: u64) -> Self {
        Self {
            from,
            to,
            removed: buffer.text_range(from, to),
            inserted: String::new(),
            stamp,
            stamps_before: buffer.stamps_range(from.line, to.line),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.removed.is_empty()
    }

    /// End of the inserted text once applied.
    pub fn inserted_end(&self) -> Position {
        end_after(self.from, &self.inserted)
    }

    /// Perform the splice as originally recorded.
    pub fn apply(&self, buffer: &mut TextBuffer) -> Position {
        if !self.removed.is_empty() {
            buffer.splice_delete(self.from, self.to, self.stamp);
        }
        if self.inserted.is_empty() {
            self.from
        } else {
            buffer.splice_insert(self.from, &self.inserted, self.stamp)
        }
    }

    /// Undo the splice and restore the line stamps captured before it.
    pub fn revert(&self, buffer: &mut TextBuffer) {
        let stamp = self.stamps_before.first().map_or(0, |s| s.change);
        if !self.inserted.is_empty() {
            buffer.splice_delete(self.from, self.inserted_end(), stamp);
        }
        if !self.removed.is_empty() {
            buffer.splice_insert(self.from, &self.removed, stamp);
        }
        buffer.restore_stamps(self.from.line, &self.stamps_before);
    }
}

/// One logical user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    pub operations: Vec<EditOperation>,
    pub caret_before: Caret,
    pub caret_after: Caret,
    pub action: UndoAction,
}

impl UndoRecord {
    /// The character typed, when this is a single one-character insertion.
    fn typed_char(&self) -> Option<char> {
        if self.action != UndoAction::Typing {
            return None;
        }
        let [op] = self.operations.as_slice() else {
            return None;
        };
        if !op.is_insertion() {
            return None;
        }
        let mut chars = op.inserted.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    /// Single insert-only record still eligible to absorb more typing.
    fn open_insertion(&self) -> Option<&EditOperation> {
        if self.action != UndoAction::Typing {
            return None;
        }
        match self.operations.as_slice() {
            [op] if op.is_insertion() && !op.inserted.contains('\n') => Some(op),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
    /// Records left of the cursor are applied, the rest are redoable
    cursor: usize,
    depth: usize,
    pending: Option<UndoRecord>,
    /// Cursor value at the last save; `None` once that state is unreachable
    save_marker: Option<usize>,
    break_coalescing: bool,
    coalesce: bool,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(true)
    }
}

impl UndoLog {
    pub fn new(coalesce: bool) -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            depth: 0,
            pending: None,
            save_marker: Some(0),
            break_coalescing: false,
            coalesce,
        }
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn can_undo(&self) -> bool {
        self.depth == 0 && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.depth == 0 && self.cursor < self.records.len()
    }

    /// Open a bracket. Only the outermost bracket's action and caret count.
    pub fn begin_edit(&mut self, action: UndoAction, caret: Caret) {
        if self.depth == 0 {
            self.pending = Some(UndoRecord {
                operations: Vec::new(),
                caret_before: caret,
                caret_after: caret,
                action,
            });
        }
        self.depth += 1;
    }

    /// Close a bracket. Returns true when the outermost bracket closed.
    pub fn end_edit(&mut self, caret: Caret) -> bool {
        if self.depth == 0 {
            warn!("end_edit without matching begin_edit");
            return false;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return false;
        }
        if let Some(mut record) = self.pending.take() {
            if !record.operations.is_empty() {
                record.caret_after = caret;
                self.seal(record);
            }
        }
        true
    }

    /// Register an operation inside the open bracket, before it is applied.
    pub fn record(&mut self, operation: EditOperation) {
        let Some(pending) = self.pending.as_mut() else {
            warn!("edit operation recorded outside of an edit bracket");
            return;
        };
        if pending.operations.is_empty() && self.cursor < self.records.len() {
            if self.save_marker.is_some_and(|marker| marker > self.cursor) {
                self.save_marker = None;
            }
            debug!(
                dropped = self.records.len() - self.cursor,
                "discarding redo history"
            );
            self.records.truncate(self.cursor);
        }
        pending.operations.push(operation);
    }

    fn seal(&mut self, record: UndoRecord) {
        let merge = self.coalesce && !self.break_coalescing && self.can_merge(&record);
        self.break_coalescing = false;
        if merge {
            if let (Some(previous), [op]) = (self.records.last_mut(), record.operations.as_slice()) {
                if let Some(target) = previous.operations.first_mut() {
                    target.inserted.push_str(&op.inserted);
                    target.stamp = op.stamp;
                    previous.caret_after = record.caret_after;
                    return;
                }
            }
        }
        self.records.push(record);
        self.cursor = self.records.len();
    }

    fn can_merge(&self, record: &UndoRecord) -> bool {
        let Some(ch) = record.typed_char() else {
            return false;
        };
        if ch == '\n' || self.cursor == 0 || self.save_marker == Some(self.cursor) {
            return false;
        }
        let Some(previous) = self.records.get(self.cursor - 1) else {
            return false;
        };
        let Some(op) = previous.open_insertion() else {
            return false;
        };
        let contiguous = op.inserted_end() == record.operations[0].from;
        let same_class = op
            .inserted
            .chars()
            .last()
            .is_some_and(|last| CharClass::of(last) == CharClass::of(ch));
        contiguous && same_class && previous.caret_after.position == record.caret_before.position
    }

    /// Stop the next typed character from merging into the last record.
    pub fn break_coalescing(&mut self) {
        self.break_coalescing = true;
    }

    /// Undo the record left of the cursor. Returns the caret to restore.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> Option<Caret> {
        if self.depth > 0 {
            warn!(depth = self.depth, "undo requested inside an open edit");
            return None;
        }
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let record = &self.records[self.cursor];
        for op in record.operations.iter().rev() {
            op.revert(buffer);
        }
        self.break_coalescing = true;
        Some(record.caret_before)
    }

    /// Redo the record right of the cursor. Returns the caret to restore.
    pub fn redo(&mut self, buffer: &mut TextBuffer) -> Option<Caret> {
        if self.depth > 0 {
            warn!(depth = self.depth, "redo requested inside an open edit");
            return None;
        }
        let record = self.records.get(self.cursor)?;
        for op in &record.operations {
            op.apply(buffer);
        }
        self.cursor += 1;
        self.break_coalescing = true;
        Some(record.caret_after)
    }

    pub fn mark_saved(&mut self) {
        self.save_marker = Some(self.cursor);
        self.break_coalescing = true;
    }

    /// True unless the applied history is exactly the saved one.
    pub fn is_modified(&self) -> bool {
        self.save_marker != Some(self.cursor)
    }

    /// Forget all history; the current state counts as saved.
    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = 0;
        self.depth = 0;
        self.pending = None;
        self.save_marker = Some(0);
        self.break_coalescing = false;
    }
}
