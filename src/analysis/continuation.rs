//! Resumable syntactic extension, advanced a bounded number of lines per tick.

use tracing::debug;

use super::engine::{GrammarEngine, LineParse};
use crate::buffer::TextBuffer;

/// Result of one [`Continuation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Done,
}

/// Parse work from a start line toward the end of the document.
#[derive(Debug)]
pub struct Continuation<C> {
    cursor: C,
    start_line: usize,
    next_line: usize,
    finished: bool,
}

impl<C> Continuation<C> {
    pub fn new(cursor: C, start_line: usize) -> Self {
        Self {
            cursor,
            start_line,
            next_line: start_line,
            finished: false,
        }
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// Next line to be parsed
    pub fn next_line(&self) -> usize {
        self.next_line
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Parse at most `budget` lines.
    pub fn step<E>(&mut self, engine: &mut E, buffer: &mut TextBuffer, budget: usize) -> Step
    where
        E: GrammarEngine<Cursor = C>,
    {
        if self.finished {
            return Step::Done;
        }
        for _ in 0..budget.max(1) {
            if self.next_line >= buffer.line_count() {
                self.finished = true;
                break;
            }
            let outcome = engine.parse_line(&mut self.cursor, buffer, self.next_line);
            self.next_line += 1;
            if outcome == LineParse::Stop {
                self.finished = true;
                break;
            }
        }
        if self.finished {
            debug!(
                start = self.start_line,
                end = self.next_line,
                "continuation finished"
            );
            Step::Done
        } else {
            Step::Continue
        }
    }
}
