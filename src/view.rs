//! Renderer seam.
//!
//! The view owns painting and caret display. The engine only tells it which
//! lines changed and hands over the styled tokens.

use crate::lexer::Token;

/// Callbacks from the engine to the renderer. Every method defaults to a no-op.
pub trait ViewObserver {
    /// Line `line` was re-lexed; `tokens` carry the display styles.
    fn line_formatted(&mut self, _line: usize, _tokens: &[Token]) {}

    /// `count` lines were inserted starting at `index`.
    fn lines_inserted(&mut self, _index: usize, _count: usize) {}

    /// `count` lines were removed starting at `index`.
    fn lines_removed(&mut self, _index: usize, _count: usize) {}

    /// Everything must be repainted (after a load or reload).
    fn refresh_needed(&mut self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl ViewObserver for NullView {}
