//! Error types for edit and document operations.
//!
//! Lexing has no error type: unterminated constructs are carried as block
//! state. Only API misuse (out-of-range positions) and collaborator I/O
//! surface as errors.

use thiserror::Error;

/// Errors from the edit primitives. Raised before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Line index past the end of the buffer.
    #[error("line {line} is out of range (buffer has {line_count} lines)")]
    InvalidLine { line: usize, line_count: usize },

    /// Character index past the end of its line.
    #[error("index {index} is out of range on line {line} (length {len})")]
    InvalidIndex { line: usize, index: usize, len: usize },
}

impl EditError {
    pub fn invalid_line(line: usize, line_count: usize) -> Self {
        Self::InvalidLine { line, line_count }
    }

    pub fn invalid_index(line: usize, index: usize, len: usize) -> Self {
        Self::InvalidIndex { line, index, len }
    }
}

/// Errors surfaced by [`Document`](crate::document::Document).
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Edit(#[from] EditError),

    /// The persistence collaborator failed to load; the buffer is empty but usable.
    #[error("failed to load document: {0}")]
    Load(#[source] std::io::Error),

    /// The persistence collaborator failed to save; in-memory state is untouched.
    #[error("failed to save document: {0}")]
    Save(#[source] std::io::Error),
}
