//! Per-line metadata kept in lock-step with the line text array.

use crate::lexer::{BlockState, Token};

/// Change and save stamps of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineStamps {
    /// Id of the most recent edit touching the line
    pub change: u64,
    /// Value of `change` when the document was last saved
    pub save: u64,
}

/// Metadata of one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInfo {
    /// Outgoing block state after lexing this line
    pub block_state: BlockState,
    pub stamps: LineStamps,
    /// How many preceding lines this line's tokenization depends on
    pub lookahead: usize,
    pub tokens: Vec<Token>,
}

impl LineInfo {
    /// Blank metadata for a line created by edit `stamp`.
    pub fn fresh(stamp: u64) -> Self {
        Self {
            stamps: LineStamps {
                change: stamp,
                save: 0,
            },
            ..Self::default()
        }
    }

    pub fn is_modified(&self) -> bool {
        self.stamps.change != self.stamps.save
    }
}
