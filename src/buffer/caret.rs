//! Caret and selection state.

use super::text_buffer::TextBuffer;
use crate::base::{Position, TabStops};

/// Caret movements understood by [`Caret::moved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    WordLeft,
    WordRight,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

impl CaretMove {
    fn is_vertical(self) -> bool {
        matches!(self, CaretMove::Up | CaretMove::Down)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caret {
    /// Edit position
    pub position: Position,
    /// Selection anchor; the selection runs between it and `position`
    pub anchor: Option<Position>,
    /// Visual column of `position`
    pub column: usize,
    /// Column remembered across vertical moves
    pub virtual_column: usize,
}

impl Caret {
    /// A caret at `position` with no selection. Columns assume no tabs
    /// until [`Caret::place`] is used.
    pub fn at(position: Position) -> Self {
        Self {
            position,
            anchor: None,
            column: position.index,
            virtual_column: position.index,
        }
    }

    /// A caret at `position` with columns computed against `buffer`.
    pub fn place(buffer: &TextBuffer, tabs: TabStops, position: Position) -> Self {
        let column = column_of(buffer, tabs, position);
        Self {
            position,
            anchor: None,
            column,
            virtual_column: column,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|anchor| anchor != self.position)
    }

    /// Selected range in document order.
    pub fn selection(&self) -> Option<(Position, Position)> {
        match self.anchor {
            Some(anchor) if anchor != self.position => {
                Some(Position::ordered(anchor, self.position))
            }
            _ => None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// The caret after `movement`. With `select`, the anchor stays where the
    /// selection started; without it, any selection is dropped.
    pub fn moved(&self, buffer: &TextBuffer, tabs: TabStops, movement: CaretMove, select: bool) -> Caret {
        let position = self.target(buffer, tabs, movement);
        let column = column_of(buffer, tabs, position);
        let anchor = if select {
            Some(self.anchor.unwrap_or(self.position))
        } else {
            None
        };
        Caret {
            position,
            anchor,
            column,
            virtual_column: if movement.is_vertical() {
                self.virtual_column
            } else {
                column
            },
        }
    }

    fn target(&self, buffer: &TextBuffer, tabs: TabStops, movement: CaretMove) -> Position {
        let Position { line, index } = self.position;
        let last_line = buffer.line_count() - 1;
        match movement {
            CaretMove::Left if index > 0 => Position::new(line, index - 1),
            CaretMove::Left if line > 0 => Position::new(line - 1, buffer.line_len(line - 1)),
            CaretMove::Left => self.position,
            CaretMove::Right if index < buffer.line_len(line) => Position::new(line, index + 1),
            CaretMove::Right if line < last_line => Position::new(line + 1, 0),
            CaretMove::Right => self.position,
            CaretMove::WordLeft => buffer.word_stop_left(self.position),
            CaretMove::WordRight => buffer.word_stop_right(self.position),
            CaretMove::Up if line > 0 => self.on_line(buffer, tabs, line - 1),
            CaretMove::Up => Position::new(0, 0),
            CaretMove::Down if line < last_line => self.on_line(buffer, tabs, line + 1),
            CaretMove::Down => buffer.end_position(),
            CaretMove::LineStart => Position::new(line, 0),
            CaretMove::LineEnd => Position::new(line, buffer.line_len(line)),
            CaretMove::DocumentStart => Position::new(0, 0),
            CaretMove::DocumentEnd => buffer.end_position(),
        }
    }

    fn on_line(&self, buffer: &TextBuffer, tabs: TabStops, line: usize) -> Position {
        let text = buffer.line(line).unwrap_or_default();
        Position::new(line, tabs.column_to_char_index(self.virtual_column, text, 0))
    }
}

fn column_of(buffer: &TextBuffer, tabs: TabStops, position: Position) -> usize {
    let text = buffer.line(position.line).unwrap_or_default();
    tabs.char_index_to_column(text, position.index, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> TextBuffer {
        TextBuffer::from_text("\tlong line here\nab\n\tx")
    }

    #[test]
    fn test_vertical_move_keeps_virtual_column() {
        let buf = buffer();
        let tabs = TabStops::default();
        let caret = Caret::place(&buf, tabs, Position::new(0, 6));
        assert_eq!(caret.column, 9);

        let down = caret.moved(&buf, tabs, CaretMove::Down, false);
        assert_eq!(down.position, Position::new(1, 2));
        assert_eq!(down.virtual_column, 9);

        let again = down.moved(&buf, tabs, CaretMove::Down, false);
        assert_eq!(again.position, Position::new(2, 2));
    }

    #[test]
    fn test_horizontal_move_wraps_lines() {
        let buf = buffer();
        let tabs = TabStops::default();
        let caret = Caret::at(Position::new(1, 0));
        let left = caret.moved(&buf, tabs, CaretMove::Left, false);
        assert_eq!(left.position, Position::new(0, 15));
        let right = left.moved(&buf, tabs, CaretMove::Right, false);
        assert_eq!(right.position, Position::new(1, 0));
    }

    #[test]
    fn test_selection_keeps_anchor() {
        let buf = buffer();
        let tabs = TabStops::default();
        let caret = Caret::at(Position::new(1, 2));
        let caret = caret.moved(&buf, tabs, CaretMove::LineStart, true);
        let caret = caret.moved(&buf, tabs, CaretMove::Up, true);
        assert_eq!(caret.anchor, Some(Position::new(1, 2)));
        assert_eq!(
            caret.selection(),
            Some((Position::new(0, 0), Position::new(1, 2)))
        );
        let cleared = caret.moved(&buf, tabs, CaretMove::Right, false);
        assert!(!cleared.has_selection());
    }
}
