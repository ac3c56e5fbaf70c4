//! Seam to the external grammar engine that owns the parse tree.

use crate::buffer::{LeafId, TextBuffer};

/// Outcome of parsing one line incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineParse {
    /// Keep feeding lines
    Continue,
    /// The tree is consistent again from here on
    Stop,
}

/// The grammar engine driven by the reanalysis driver.
///
/// The engine owns its tree. Tokens refer to tree leaves only through
/// [`LeafId`]s kept in the buffer's [`LeafTable`](crate::buffer::LeafTable);
/// an engine attaches leaves with
/// [`TextBuffer::tokens_and_leaves_mut`] while parsing and must treat ids that
/// the table reports as stale as gone.
pub trait GrammarEngine {
    /// Resumable parse position handed back on every incremental step.
    type Cursor;

    /// Parse the whole document from scratch, replacing any existing tree.
    fn parse_document(&mut self, buffer: &mut TextBuffer);

    /// The last leaf on a line strictly before `line` whose node parsed
    /// without error, if any.
    fn last_clean_leaf_before(&self, buffer: &TextBuffer, line: usize) -> Option<LeafId>;

    /// Drop the children of `leaf`'s ancestors from `leaf` onward. `None`
    /// invalidates the whole tree.
    fn invalidate_from(&mut self, buffer: &TextBuffer, leaf: Option<LeafId>);

    /// A cursor ready to parse `line` against the invalidated tree.
    fn cursor_at(&mut self, buffer: &TextBuffer, line: usize) -> Self::Cursor;

    /// Parse one line at the cursor.
    fn parse_line(&mut self, cursor: &mut Self::Cursor, buffer: &mut TextBuffer, line: usize) -> LineParse;

    /// The token at `(line, token)` was not re-lexed but its lexing context
    /// moved; reattach whatever leaf refers to it.
    fn reparse_token(&mut self, buffer: &mut TextBuffer, line: usize, token: usize);
}

/// Engine that keeps no tree, for hosts that only need tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGrammar;

impl GrammarEngine for NullGrammar {
    type Cursor = ();

    fn parse_document(&mut self, _buffer: &mut TextBuffer) {}

    fn last_clean_leaf_before(&self, _buffer: &TextBuffer, _line: usize) -> Option<LeafId> {
        None
    }

    fn invalidate_from(&mut self, _buffer: &TextBuffer, _leaf: Option<LeafId>) {}

    fn cursor_at(&mut self, _buffer: &TextBuffer, _line: usize) {}

    fn parse_line(&mut self, _cursor: &mut (), _buffer: &mut TextBuffer, _line: usize) -> LineParse {
        LineParse::Stop
    }

    fn reparse_token(&mut self, _buffer: &mut TextBuffer, _line: usize, _token: usize) {}
}
