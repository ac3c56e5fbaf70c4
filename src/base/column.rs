//! Character index ↔ visual column mapping.
//!
//! Columns are what the user sees: every character advances one column except
//! a tab, which advances to the next multiple of the tab size.

/// Default tab stop width
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Tab-stop aware column arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStops {
    size: usize,
}

impl Default for TabStops {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_SIZE)
    }
}

impl TabStops {
    /// A zero size is treated as 1.
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Column reached after `column` when the next character is `ch`.
    #[inline]
    pub fn advance(&self, column: usize, ch: char) -> usize {
        if ch == '\t' {
            (column / self.size + 1) * self.size
        } else {
            column + 1
        }
    }

    /// Visual column of the character at `index`, starting the walk at `start_column`.
    ///
    /// An `index` past the end of the line yields the column of the line end.
    pub fn char_index_to_column(&self, line: &str, index: usize, start_column: usize) -> usize {
        line.chars()
            .take(index)
            .fold(start_column, |column, ch| self.advance(column, ch))
    }

    /// Character index displayed at `column`, counting columns from `row_start`.
    ///
    /// A column inside a tab cell snaps to the tab itself when it is in the
    /// first half of the cell and to the character after the tab otherwise.
    pub fn column_to_char_index(&self, column: usize, line: &str, row_start: usize) -> usize {
        let mut current = 0;
        let mut index = row_start;
        for ch in line.chars().skip(row_start) {
            if current >= column {
                return index;
            }
            let next = self.advance(current, ch);
            if next > column {
                if ch != '\t' {
                    return index;
                }
                let remainder = column % self.size;
                return if remainder < self.size / 2 {
                    index
                } else {
                    index + 1
                };
            }
            current = next;
            index += 1;
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_advances_to_next_stop() {
        let stops = TabStops::default();
        assert_eq!(stops.advance(0, '\t'), 4);
        assert_eq!(stops.advance(3, '\t'), 4);
        assert_eq!(stops.advance(4, '\t'), 8);
        assert_eq!(stops.advance(5, 'x'), 6);
    }

    #[test]
    fn test_column_of_mixed_line() {
        let stops = TabStops::default();
        let line = "ab\tc\td";
        assert_eq!(stops.char_index_to_column(line, 0, 0), 0);
        assert_eq!(stops.char_index_to_column(line, 2, 0), 2);
        assert_eq!(stops.char_index_to_column(line, 3, 0), 4);
        assert_eq!(stops.char_index_to_column(line, 5, 0), 8);
        assert_eq!(stops.char_index_to_column(line, 99, 0), 9);
    }

    #[test]
    fn test_mid_tab_rounding() {
        let stops = TabStops::default();
        // The tab at index 0 covers columns 0..4
        let line = "\tx";
        assert_eq!(stops.column_to_char_index(0, line, 0), 0);
        assert_eq!(stops.column_to_char_index(1, line, 0), 0);
        assert_eq!(stops.column_to_char_index(2, line, 0), 1);
        assert_eq!(stops.column_to_char_index(3, line, 0), 1);
        assert_eq!(stops.column_to_char_index(4, line, 0), 1);
        assert_eq!(stops.column_to_char_index(40, line, 0), 2);
    }

    #[test]
    fn test_row_start_offsets_walk() {
        let stops = TabStops::default();
        assert_eq!(stops.column_to_char_index(2, "abcdef", 3), 5);
    }
}
