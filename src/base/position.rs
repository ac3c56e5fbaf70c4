//! Position tracking for the line model
//!
//! A [`Position`] addresses a character (not a byte) inside a line. A [`Span`]
//! stores its end relative to its anchor so that shifting a span after an edit
//! only touches the anchor.

use std::cmp::Ordering;

/// A position in the buffer (0-indexed line, 0-indexed character index)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub index: usize,
}

impl Position {
    pub fn new(line: usize, index: usize) -> Self {
        Self { line, index }
    }

    /// Order two positions so that the first is not after the second.
    pub fn ordered(a: Position, b: Position) -> (Position, Position) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

/// A span anchored at `(line, index)`.
///
/// The end is stored relative to the anchor:
/// - `line_delta == 0`: the end is `(line, index + index_delta)`
/// - `line_delta > 0`: the end is `(line + line_delta, index_delta)`, i.e.
///   `index_delta` is the character index on the last line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: usize,
    pub index: usize,
    pub line_delta: usize,
    pub index_delta: usize,
}

impl Span {
    /// Create a span covering `from..to` (the arguments may come in any order).
    pub fn create(from: Position, to: Position) -> Self {
        let (from, to) = Position::ordered(from, to);
        let line_delta = to.line - from.line;
        let index_delta = if line_delta == 0 {
            to.index - from.index
        } else {
            to.index
        };
        Self {
            line: from.line,
            index: from.index,
            line_delta,
            index_delta,
        }
    }

    /// Empty span at a position
    pub fn empty(at: Position) -> Self {
        Self::create(at, at)
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.index)
    }

    pub fn end(&self) -> Position {
        if self.line_delta == 0 {
            Position::new(self.line, self.index + self.index_delta)
        } else {
            Position::new(self.line + self.line_delta, self.index_delta)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line_delta == 0 && self.index_delta == 0
    }

    /// The gap between the end of `first` and the start of `second`.
    pub fn create_between(first: &Span, second: &Span) -> Self {
        let first_end_line = first.line + first.line_delta;
        let first_end_index = if first.line_delta == 0 {
            first.index + first.index_delta
        } else {
            first.index_delta
        };
        Self::from_anchor_to(first_end_line, first_end_index, second.line, second.index)
    }

    /// The smallest span containing both `first` and `second`, assuming
    /// `first` starts no later than `second` ends.
    pub fn create_enclosing(first: &Span, second: &Span) -> Self {
        let last_line = second.line + second.line_delta;
        let last_index = if second.line_delta == 0 {
            second.index + second.index_delta
        } else {
            second.index_delta
        };
        Self::from_anchor_to(first.line, first.index, last_line, last_index)
    }

    fn from_anchor_to(line: usize, index: usize, end_line: usize, end_index: usize) -> Self {
        match end_line.cmp(&line) {
            Ordering::Greater => Self {
                line,
                index,
                line_delta: end_line - line,
                index_delta: end_index,
            },
            Ordering::Equal if end_index >= index => Self {
                line,
                index,
                line_delta: 0,
                index_delta: end_index - index,
            },
            // Reversed input collapses to an empty span at the anchor
            _ => Self {
                line,
                index,
                line_delta: 0,
                index_delta: 0,
            },
        }
    }

    /// Check if a position falls within this span (both ends inclusive)
    pub fn contains(&self, position: Position) -> bool {
        if position.line < self.line || position.line > self.line + self.line_delta {
            return false;
        }
        if position.line == self.line && position.index < self.index {
            return false;
        }
        if position.line == self.line + self.line_delta {
            let limit = if self.line_delta == 0 {
                self.index + self.index_delta
            } else {
                self.index_delta
            };
            if position.index > limit {
                return false;
            }
        }
        true
    }

    /// Move the span by a number of lines, keeping its shape.
    pub fn shift_lines(&mut self, delta: isize) {
        self.line = self.line.saturating_add_signed(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_single_line() {
        let span = Span::create(Position::new(2, 4), Position::new(2, 9));
        assert_eq!(span.line_delta, 0);
        assert_eq!(span.index_delta, 5);
        assert_eq!(span.end(), Position::new(2, 9));
    }

    #[test]
    fn test_create_normalizes_order() {
        let span = Span::create(Position::new(5, 1), Position::new(3, 7));
        assert_eq!(span.start(), Position::new(3, 7));
        assert_eq!(span.end(), Position::new(5, 1));
        assert_eq!(span.index_delta, 1);
    }

    #[test]
    fn test_between_and_enclosing() {
        let a = Span::create(Position::new(1, 0), Position::new(1, 3));
        let b = Span::create(Position::new(2, 2), Position::new(4, 1));

        let gap = Span::create_between(&a, &b);
        assert_eq!(gap.start(), Position::new(1, 3));
        assert_eq!(gap.end(), Position::new(2, 2));

        let all = Span::create_enclosing(&a, &b);
        assert_eq!(all.start(), Position::new(1, 0));
        assert_eq!(all.end(), Position::new(4, 1));
    }

    #[test]
    fn test_shift_keeps_shape() {
        let mut span = Span::create(Position::new(3, 2), Position::new(4, 6));
        span.shift_lines(2);
        assert_eq!(span.start(), Position::new(5, 2));
        assert_eq!(span.end(), Position::new(6, 6));
        span.shift_lines(-5);
        assert_eq!(span.start(), Position::new(0, 2));
    }
}
