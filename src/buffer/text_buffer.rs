//! Line array with lock-step metadata and the insert/delete primitives.
//!
//! The primitives here do not talk to the undo log; [`Document`] registers
//! undo deltas before calling them, and the undo log calls them directly when
//! replaying. Every structural change is reported twice: as a
//! [`BufferEvent`] for collaborators that keep line-indexed state, and as a
//! widening of the pending [`DirtyRange`] consumed by the reanalysis driver.
//!
//! [`Document`]: crate::document::Document

use std::borrow::Cow;

use tracing::warn;

use super::leaves::{LeafPosition, LeafTable};
use super::line::{LineInfo, LineStamps};
use crate::base::{Position, word_stop_left, word_stop_right};
use crate::error::EditError;
use crate::lexer::{BlockState, LexedLine, Token};

/// Structural notification for lines entering or leaving the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    LinesInserted { index: usize, count: usize },
    LinesRemoved { index: usize, count: usize },
}

/// Lines touched since the range was last taken, in current numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRange {
    pub first: usize,
    pub last: usize,
    /// Every change was an insertion at the very end of the document
    pub append_only: bool,
}

impl DirtyRange {
    fn union(self, first: usize, last: usize, append_only: bool) -> Self {
        Self {
            first: self.first.min(first),
            last: self.last.max(last),
            append_only: self.append_only && append_only,
        }
    }
}

/// Byte offset of character `index` in `line` (line length when past the end).
pub(crate) fn byte_offset(line: &str, index: usize) -> usize {
    line.char_indices().nth(index).map_or(line.len(), |(b, _)| b)
}

/// Split inserted text into line segments, dropping `\r` before `\n`.
fn segments(text: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = text.split('\n').collect();
    let last = parts.len() - 1;
    for part in &mut parts[..last] {
        *part = part.strip_suffix('\r').unwrap_or(part);
    }
    parts
}

/// `text` with `\r\n` folded to `\n`, the form the buffer stores.
pub(crate) fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Position just past `text` when inserted at `start`.
pub(crate) fn end_after(start: Position, text: &str) -> Position {
    match text.rfind('\n') {
        None => Position::new(start.line, start.index + text.chars().count()),
        Some(at) => Position::new(
            start.line + text.matches('\n').count(),
            text[at + 1..].chars().count(),
        ),
    }
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    meta: Vec<LineInfo>,
    leaves: LeafTable,
    events: Vec<BufferEvent>,
    dirty: Option<DirtyRange>,
    last_stamp: u64,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// A buffer holding one empty line
    pub fn new() -> Self {
        Self::from_lines(Vec::new())
    }

    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut buffer = Self {
            lines: Vec::new(),
            meta: Vec::new(),
            leaves: LeafTable::new(),
            events: Vec::new(),
            dirty: None,
            last_stamp: 0,
        };
        buffer.reset(lines);
        buffer
    }

    /// Parse `text` into lines on `\n` (a trailing `\r` per line is dropped).
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(segments(text).into_iter().map(str::to_string).collect())
    }

    /// Replace the whole content. Stamps restart at zero, leaves are dropped.
    pub fn reset(&mut self, mut lines: Vec<String>) {
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.meta = vec![LineInfo::default(); lines.len()];
        self.lines = lines;
        self.leaves.clear();
        self.events.clear();
        self.dirty = None;
    }

    // ── Query ───────────────────────────────────────────────────────

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// Length of a line in characters (0 for missing lines)
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    pub fn info(&self, line: usize) -> Option<&LineInfo> {
        self.meta.get(line)
    }

    pub fn tokens(&self, line: usize) -> &[Token] {
        self.meta
            .get(line)
            .map(|m| m.tokens.as_slice())
            .unwrap_or_default()
    }

    pub fn block_state(&self, line: usize) -> BlockState {
        self.meta.get(line).map_or(BlockState::Plain, |m| m.block_state)
    }

    /// State a line starts lexing in: the outgoing state of the line above.
    pub fn incoming_state(&self, line: usize) -> BlockState {
        if line == 0 {
            BlockState::Plain
        } else {
            self.block_state(line - 1)
        }
    }

    pub fn stamps(&self, line: usize) -> LineStamps {
        self.meta.get(line).map_or_else(LineStamps::default, |m| m.stamps)
    }

    pub fn leaves(&self) -> &LeafTable {
        &self.leaves
    }

    pub fn leaves_mut(&mut self) -> &mut LeafTable {
        &mut self.leaves
    }

    /// Tokens of a line together with the leaf table, for attaching leaves.
    pub fn tokens_and_leaves_mut(&mut self, line: usize) -> Option<(&mut [Token], &mut LeafTable)> {
        let info = self.meta.get_mut(line)?;
        Some((info.tokens.as_mut_slice(), &mut self.leaves))
    }

    /// Whole content joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn end_position(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.line_len(last))
    }

    pub fn is_modified_line(&self, line: usize) -> bool {
        self.meta.get(line).is_some_and(LineInfo::is_modified)
    }

    pub fn validate(&self, position: Position) -> Result<(), EditError> {
        let Some(line) = self.lines.get(position.line) else {
            return Err(EditError::invalid_line(position.line, self.lines.len()));
        };
        let len = line.chars().count();
        if position.index > len {
            return Err(EditError::invalid_index(position.line, position.index, len));
        }
        Ok(())
    }

    /// Text between two valid positions (`from <= to`), lines joined with `\n`.
    pub fn text_range(&self, from: Position, to: Position) -> String {
        if from.line == to.line {
            let line = &self.lines[from.line];
            return line[byte_offset(line, from.index)..byte_offset(line, to.index)].to_string();
        }
        let first = &self.lines[from.line];
        let last = &self.lines[to.line];
        let mut text = first[byte_offset(first, from.index)..].to_string();
        for line in &self.lines[from.line + 1..to.line] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(&last[..byte_offset(last, to.index)]);
        text
    }

    pub fn word_stop_left(&self, position: Position) -> Position {
        if position.index == 0 {
            return match position.line {
                0 => position,
                line => Position::new(line - 1, self.line_len(line - 1)),
            };
        }
        let line = self.line(position.line).unwrap_or_default();
        Position::new(position.line, word_stop_left(line, position.index))
    }

    pub fn word_stop_right(&self, position: Position) -> Position {
        if position.index >= self.line_len(position.line) {
            return if position.line + 1 < self.lines.len() {
                Position::new(position.line + 1, 0)
            } else {
                position
            };
        }
        let line = self.line(position.line).unwrap_or_default();
        Position::new(position.line, word_stop_right(line, position.index))
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Structural events since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<BufferEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_dirty(&mut self) -> Option<DirtyRange> {
        self.dirty.take()
    }

    pub fn peek_dirty(&self) -> Option<DirtyRange> {
        self.dirty
    }

    fn mark_dirty(&mut self, first: usize, last: usize, append_only: bool) {
        self.dirty = Some(match self.dirty {
            Some(range) => range.union(first, last, append_only),
            None => DirtyRange {
                first,
                last,
                append_only,
            },
        });
    }

    // ── Stamps ──────────────────────────────────────────────────────

    /// Allocate the id for the next edit.
    pub fn next_stamp(&mut self) -> u64 {
        self.last_stamp += 1;
        self.last_stamp
    }

    /// Snapshot of the stamps of lines `first..=last`.
    pub fn stamps_range(&self, first: usize, last: usize) -> Vec<LineStamps> {
        self.meta[first..=last].iter().map(|m| m.stamps).collect()
    }

    /// Restore stamps starting at `first`; lines past the end are skipped.
    pub fn restore_stamps(&mut self, first: usize, stamps: &[LineStamps]) {
        for (info, stamps) in self.meta.iter_mut().skip(first).zip(stamps) {
            info.stamps = *stamps;
        }
    }

    /// Record the current change stamp of every line as saved.
    pub fn mark_saved(&mut self) {
        for info in &mut self.meta {
            info.stamps.save = info.stamps.change;
        }
    }

    // ── Primitives ──────────────────────────────────────────────────

    /// Insert `text` at a valid `position`, stamping touched lines with
    /// `stamp`. Returns the position just after the inserted text.
    pub fn splice_insert(&mut self, position: Position, text: &str, stamp: u64) -> Position {
        let append = position == self.end_position();
        let parts = segments(text);
        let row = position.line;
        let byte = byte_offset(&self.lines[row], position.index);

        if parts.len() == 1 {
            self.lines[row].insert_str(byte, parts[0]);
            self.meta[row].stamps.change = stamp;
            self.mark_dirty(row, row, append);
            return Position::new(row, position.index + parts[0].chars().count());
        }

        let added = parts.len() - 1;
        let tail = self.lines[row].split_off(byte);
        self.lines[row].push_str(parts[0]);

        let mut new_lines: Vec<String> = parts[1..].iter().map(|s| s.to_string()).collect();
        let end_index = parts[added].chars().count();
        if let Some(last) = new_lines.last_mut() {
            last.push_str(&tail);
        }

        // The segment holding the old tail inherits the old line end state
        let mut new_meta: Vec<LineInfo> = (0..added).map(|_| LineInfo::fresh(stamp)).collect();
        let head = &mut self.meta[row];
        head.stamps.change = stamp;
        if let Some(last) = new_meta.last_mut() {
            last.block_state = std::mem::take(&mut head.block_state);
        }

        self.leaves.shift_lines(row + 1, added as isize);
        self.lines.splice(row + 1..row + 1, new_lines);
        self.meta.splice(row + 1..row + 1, new_meta);
        debug_assert_eq!(self.lines.len(), self.meta.len());

        if let Some(range) = self.dirty.as_mut() {
            if range.first > row {
                range.first += added;
            }
            if range.last > row {
                range.last += added;
            }
        }
        self.mark_dirty(row, row + added, append);
        self.events.push(BufferEvent::LinesInserted {
            index: row + 1,
            count: added,
        });

        Position::new(row + added, end_index)
    }

    /// Delete the text between two valid positions (`from <= to`), stamping
    /// the surviving line with `stamp`. Returns the removed text.
    pub fn splice_delete(&mut self, from: Position, to: Position, stamp: u64) -> String {
        let removed = self.text_range(from, to);
        let row = from.line;

        if from.line == to.line {
            let line = &mut self.lines[row];
            let start = byte_offset(line, from.index);
            let end = byte_offset(line, to.index);
            line.replace_range(start..end, "");
            self.meta[row].stamps.change = stamp;
            self.mark_dirty(row, row, false);
            return removed;
        }

        let count = to.line - from.line;
        let last = &self.lines[to.line];
        let tail = last[byte_offset(last, to.index)..].to_string();
        let head = &mut self.lines[row];
        let cut = byte_offset(head, from.index);
        head.truncate(cut);
        head.push_str(&tail);

        self.lines.drain(row + 1..=to.line);
        let mut gone: Vec<LineInfo> = self.meta.drain(row + 1..=to.line).collect();
        debug_assert_eq!(self.lines.len(), self.meta.len());

        for info in &mut gone {
            self.leaves.release_tokens(&mut info.tokens);
        }
        self.leaves.shift_lines(to.line + 1, -(count as isize));

        // The merged line ends where the last removed line ended
        let merged = &mut self.meta[row];
        merged.stamps.change = stamp;
        if let Some(last) = gone.last() {
            merged.block_state = last.block_state;
        }

        if let Some(range) = self.dirty.as_mut() {
            let remap = |line: usize| {
                if line <= row {
                    line
                } else if line <= row + count {
                    row
                } else {
                    line - count
                }
            };
            range.first = remap(range.first);
            range.last = remap(range.last);
        }
        self.mark_dirty(row, row, false);
        self.events.push(BufferEvent::LinesRemoved {
            index: row + 1,
            count,
        });

        removed
    }

    // ── Lexer results ───────────────────────────────────────────────

    /// Install freshly lexed tokens for a line, releasing the leaves of the
    /// tokens they replace. Returns the line's previous outgoing state.
    pub fn set_lexed(&mut self, line: usize, lexed: LexedLine, lookahead: usize) -> BlockState {
        let Some(info) = self.meta.get_mut(line) else {
            warn!(line, "lexer result for a line that no longer exists");
            return BlockState::Plain;
        };
        self.leaves.release_tokens(&mut info.tokens);
        let previous = info.block_state;
        info.tokens = lexed.tokens;
        info.block_state = lexed.state;
        info.lookahead = lookahead;
        previous
    }

    pub fn set_lookahead(&mut self, line: usize, lookahead: usize) {
        if let Some(info) = self.meta.get_mut(line) {
            info.lookahead = lookahead;
        }
    }

    /// Repair token ↔ leaf drift: rebind live leaves to the position of the
    /// token holding them and drop stale references. Returns the number of
    /// corrections made.
    pub fn resync_leaves(&mut self) -> usize {
        let mut fixed = 0;
        for (line, info) in self.meta.iter_mut().enumerate() {
            for (index, token) in info.tokens.iter_mut().enumerate() {
                let Some(id) = token.leaf else { continue };
                let here = LeafPosition::new(line, index);
                match self.leaves.get(id) {
                    Some(position) if position == here => {}
                    Some(position) => {
                        warn!(?position, line, index, "leaf drifted from its token, rebinding");
                        self.leaves.set(id, here);
                        fixed += 1;
                    }
                    None => {
                        warn!(line, index, "token held a stale leaf id, clearing");
                        token.leaf = None;
                        fixed += 1;
                    }
                }
            }
        }
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        TextBuffer::from_text(text)
    }

    #[test]
    fn test_insert_single_line() {
        let mut buf = buffer("hello world");
        let end = buf.splice_insert(Position::new(0, 5), ",", 1);
        assert_eq!(buf.text(), "hello, world");
        assert_eq!(end, Position::new(0, 6));
        assert!(buf.drain_events().is_empty());
        assert_eq!(buf.stamps(0).change, 1);
    }

    #[test]
    fn test_insert_multi_line_splits() {
        let mut buf = buffer("headtail\nnext");
        let end = buf.splice_insert(Position::new(0, 4), "A\nB\nC", 7);
        assert_eq!(buf.text(), "headA\nB\nCtail\nnext");
        assert_eq!(end, Position::new(2, 1));
        assert_eq!(buf.line_count(), 4);
        assert_eq!(
            buf.drain_events(),
            vec![BufferEvent::LinesInserted { index: 1, count: 2 }]
        );
        assert_eq!(buf.stamps(1), LineStamps { change: 7, save: 0 });
        assert_eq!(buf.stamps(3), LineStamps::default());
    }

    #[test]
    fn test_delete_across_lines_merges() {
        let mut buf = buffer("one\ntwo\nthree\nfour");
        let removed = buf.splice_delete(Position::new(0, 1), Position::new(2, 2), 3);
        assert_eq!(removed, "ne\ntwo\nth");
        assert_eq!(buf.text(), "oree\nfour");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(
            buf.drain_events(),
            vec![BufferEvent::LinesRemoved { index: 1, count: 2 }]
        );
    }

    #[test]
    fn test_crlf_in_inserted_text_is_normalized() {
        let mut buf = buffer("");
        buf.splice_insert(Position::new(0, 0), "a\r\nb", 1);
        assert_eq!(buf.line(0), Some("a"));
        assert_eq!(buf.line(1), Some("b"));
    }

    #[test]
    fn test_dirty_range_follows_renumbering() {
        let mut buf = buffer("a\nb\nc\nd");
        buf.splice_insert(Position::new(3, 0), "x", 1);
        buf.splice_insert(Position::new(0, 1), "\n\n", 2);
        let dirty = buf.take_dirty().unwrap();
        assert_eq!((dirty.first, dirty.last), (0, 5));
        assert!(!dirty.append_only);

        buf.splice_delete(Position::new(0, 0), Position::new(2, 0), 3);
        let dirty = buf.take_dirty().unwrap();
        assert_eq!((dirty.first, dirty.last), (0, 0));
    }

    #[test]
    fn test_append_at_end_is_flagged() {
        let mut buf = buffer("a\nb");
        buf.splice_insert(Position::new(1, 1), "\nc", 1);
        assert!(buf.take_dirty().unwrap().append_only);
    }

    #[test]
    fn test_word_stops_cross_lines() {
        let buf = buffer("ab cd\nef");
        assert_eq!(buf.word_stop_right(Position::new(0, 5)), Position::new(1, 0));
        assert_eq!(buf.word_stop_left(Position::new(1, 0)), Position::new(0, 5));
        assert_eq!(buf.word_stop_right(Position::new(0, 0)), Position::new(0, 2));
    }
}
