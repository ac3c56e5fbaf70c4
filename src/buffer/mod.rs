//! Mutable line model: text, per-line metadata, caret and edit history.
//!
//! - [`TextBuffer`] - lines plus lock-step [`LineInfo`], insert/delete splices
//! - [`UndoLog`] - bracketed, coalescing, invertible history
//! - [`Caret`] - caret, selection and remembered column
//! - [`LeafTable`] - token ↔ parse-tree leaf side table
//!
//! Depends on: base, lexer (token types only).

mod caret;
mod leaves;
mod line;
mod text_buffer;
mod undo;

pub use caret::{Caret, CaretMove};
pub use leaves::{LeafId, LeafPosition, LeafTable};
pub use line::{LineInfo, LineStamps};
pub use text_buffer::{BufferEvent, DirtyRange, TextBuffer};
pub use undo::{EditOperation, UndoAction, UndoLog, UndoRecord};

pub(crate) use text_buffer::normalize_newlines;
