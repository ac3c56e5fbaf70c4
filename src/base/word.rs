//! Word boundaries for caret movement and undo coalescing.

/// Character class used for word stops and typing coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Space or tab
    Space,
    Digit,
    /// Letter or underscore
    Word,
    Other,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        if ch == ' ' || ch == '\t' {
            CharClass::Space
        } else if ch.is_ascii_digit() {
            CharClass::Digit
        } else if ch == '_' || unicode_ident::is_xid_start(ch) {
            CharClass::Word
        } else {
            CharClass::Other
        }
    }

    /// Letters and digits glue into one word.
    fn joins(self, other: CharClass) -> bool {
        self == other
            || matches!(
                (self, other),
                (CharClass::Word, CharClass::Digit) | (CharClass::Digit, CharClass::Word)
            )
    }
}

/// Class of `chars[i]`, counting a `.` between two digits as a digit.
fn class_at(chars: &[char], i: usize) -> CharClass {
    let ch = chars[i];
    if ch == '.'
        && i > 0
        && i + 1 < chars.len()
        && chars[i - 1].is_ascii_digit()
        && chars[i + 1].is_ascii_digit()
    {
        return CharClass::Digit;
    }
    CharClass::of(ch)
}

/// Index of the first word boundary strictly after `index`.
pub fn word_stop_right(line: &str, index: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    if index >= chars.len() {
        return chars.len();
    }
    let run = class_at(&chars, index);
    let mut end = index + 1;
    while end < chars.len() && run.joins(class_at(&chars, end)) {
        end += 1;
    }
    end
}

/// Index of the first word boundary strictly before `index`.
pub fn word_stop_left(line: &str, index: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let index = index.min(chars.len());
    if index == 0 {
        return 0;
    }
    let run = class_at(&chars, index - 1);
    let mut start = index - 1;
    while start > 0 && run.joins(class_at(&chars, start - 1)) {
        start -= 1;
    }
    start
}
